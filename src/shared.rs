//! Shared Cache Handle
//!
//! Wraps a `CacheStore` in `Arc<Mutex<..>>` so several tasks can use one
//! cache. Every call takes the same exclusive lock: `get` mutates recency
//! and may drop expired entries, so there is no read-only path to share.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, CacheStore, Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// Cloneable handle to a single mutex-guarded cache.
///
/// Clones share the same store.
#[derive(Debug)]
pub struct SharedCache<K, V, C = MonotonicClock> {
    inner: Arc<Mutex<CacheStore<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V, MonotonicClock>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Creates a shared cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(CacheStore::from_config(config)?))
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
    C: Clock,
{
    /// Takes ownership of `store`.
    pub fn new(store: CacheStore<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // == Get ==
    /// Retrieves a live value and marks it most recently used.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.get(key)
    }

    // == Put ==
    /// Stores a key-value pair expiring `ttl` from now.
    pub async fn put(&self, key: K, value: V, ttl: Duration) {
        self.inner.lock().await.put(key, value, ttl);
    }

    // == Set ==
    /// Stores a key-value pair with the default TTL.
    pub async fn set(&self, key: K, value: V) {
        self.inner.lock().await.set(key, value);
    }

    // == Remove ==
    /// Removes an entry by key.
    pub async fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.remove(key)
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    /// Runs `f` against the store while holding the lock once.
    ///
    /// Use this for read-modify-write sequences that must not interleave
    /// with other callers.
    pub async fn with_store<R>(&self, f: impl FnOnce(&mut CacheStore<K, V, C>) -> R) -> R {
        let mut store = self.inner.lock().await;
        f(&mut *store)
    }
}
