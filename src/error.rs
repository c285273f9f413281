//! Error types for the cache
//!
//! Provides unified error handling using thiserror. Lookups never fail:
//! a miss is `None`, so the only errors are construction-time faults.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity below zero was requested
    #[error("Invalid capacity: {0} (must be >= 0)")]
    InvalidCapacity(i64),

    /// Configuration rejected for another reason
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
