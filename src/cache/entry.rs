//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use tracing::debug;

// == Cache Entry ==
/// A single cache entry: key, value and absolute expiry instant.
///
/// The key is stored alongside the value so that evicting from the back of
/// the recency list can also drop the index mapping.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration instant on the monotonic clock, None = never expires
    pub expires_at: Option<Instant>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl` after `now`.
    pub fn new(key: K, value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: deadline(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Strictly after: an entry read at exactly `expires_at` is still live.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires| now > expires)
    }

    // == Renew ==
    /// Replaces the value and re-anchors the expiry on `now`.
    pub fn renew(&mut self, value: V, now: Instant, ttl: Duration) {
        self.value = value;
        self.expires_at = deadline(now, ttl);
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, zero once expired.
    ///
    /// An entry that never expires reports `Duration::MAX`.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.expires_at
            .map_or(Duration::MAX, |expires| expires.saturating_duration_since(now))
    }
}

// == Deadline ==
/// Computes `now + ttl`, or `None` when the sum does not fit in an `Instant`.
fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    let expires = now.checked_add(ttl);
    if expires.is_none() {
        debug!(ttl = ?ttl, "TTL past the clock's range, entry never expires");
    }
    expires
}
