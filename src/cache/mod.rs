//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction and TTL expiry that
//! is enforced lazily, on access.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::time::Duration;

// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::CacheEntry;
pub use lru::{Iter, RecencyList, SlotId};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied by `CacheStore::set` when no configuration says otherwise
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Smallest TTL an entry can carry; zero TTLs are raised to this
pub const MIN_TTL: Duration = Duration::from_nanos(1);
