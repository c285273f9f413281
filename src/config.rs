//! Configuration Module
//!
//! Describes how a cache should be built. Capacity is signed so that a
//! negative value coming from a config file is representable and rejected
//! instead of wrapping.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_TTL;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: i64,
    /// TTL in milliseconds applied by `CacheStore::set`
    pub default_ttl_ms: u64,
}

impl CacheConfig {
    /// Creates a config with the given capacity and default TTL.
    pub fn new(capacity: i64, default_ttl: Duration) -> Self {
        Self {
            capacity,
            default_ttl_ms: ttl_to_millis(default_ttl),
        }
    }

    /// Returns the default TTL as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    /// Checks the configuration and returns the capacity as `usize`.
    ///
    /// # Errors
    /// - `InvalidCapacity` if `capacity` is negative
    /// - `InvalidConfig` if `default_ttl_ms` is zero
    pub fn validate(&self) -> Result<usize> {
        let capacity =
            usize::try_from(self.capacity).map_err(|_| CacheError::InvalidCapacity(self.capacity))?;
        if self.default_ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "default_ttl_ms must be greater than zero".to_string(),
            ));
        }
        Ok(capacity)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl_ms: ttl_to_millis(DEFAULT_TTL),
        }
    }
}

/// Whole milliseconds for `ttl`, rounding any fraction up.
///
/// A positive TTL never becomes zero; one too large for `u64` saturates.
fn ttl_to_millis(ttl: Duration) -> u64 {
    let millis = ttl.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}
