//! Cache Statistics Module
//!
//! Tracks cache counters: hits, misses, lazy expirations and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of live entries returned by `get`
    pub hits: u64,
    /// Number of `get` calls that found nothing live (absent or expired)
    pub misses: u64,
    /// Number of expired entries discovered and removed on access
    pub expirations: u64,
    /// Number of entries evicted to enforce capacity
    pub evictions: u64,
    /// Number of fresh entries written
    pub inserts: u64,
    /// Number of live entries renewed in place
    pub updates: u64,
    /// Current number of entries in the cache (live or not)
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expiration ==
    /// Increments the lazy expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Insert ==
    /// Increments the fresh insert counter.
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    // == Record Update ==
    /// Increments the in-place renewal counter.
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
