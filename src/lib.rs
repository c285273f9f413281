//! Lazy LRU - A bounded in-memory cache
//!
//! Combines least-recently-used eviction with per-entry TTLs that are only
//! checked when an entry is touched. There is no background sweep.

pub mod cache;
pub mod config;
pub mod error;
pub mod shared;

pub use cache::{CacheStats, CacheStore, Clock, ManualClock, MonotonicClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
