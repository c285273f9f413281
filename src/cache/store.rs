//! Cache Store Module
//!
//! Main cache engine combining a key index with an arena recency list and
//! lazily enforced TTL expiry.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{
    CacheEntry, CacheStats, Clock, MonotonicClock, RecencyList, SlotId, DEFAULT_TTL, MIN_TTL,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded cache with LRU eviction and lazily evicted TTLs.
///
/// Expired entries are never swept in the background. They stay in place,
/// still occupying a slot, until `get` or `put` touches their key or they
/// drift to the back of the recency list and get evicted for capacity.
///
/// Every operation that can observe an entry takes `&mut self`, because a
/// read may reorder recency or drop an expired entry.
#[derive(Debug)]
pub struct CacheStore<K, V, C = MonotonicClock> {
    /// Key to recency-list slot
    index: HashMap<K, SlotId>,
    /// Entries ordered from most to least recently used
    order: RecencyList<CacheEntry<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries retained after a put
    capacity: usize,
    /// TTL applied by `set`
    default_ttl: Duration,
    clock: C,
}

impl<K, V> CacheStore<K, V, MonotonicClock>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// A capacity of zero is legal: every put is evicted straight away.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, MonotonicClock)
    }

    /// Creates an empty store from a signed capacity.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is negative.
    pub fn try_new(capacity: i64) -> Result<Self> {
        let capacity =
            usize::try_from(capacity).map_err(|_| CacheError::InvalidCapacity(capacity))?;
        Ok(Self::new(capacity))
    }

    /// Creates an empty store from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::from_config_with_clock(config, MonotonicClock)
    }
}

impl<K, V, C> CacheStore<K, V, C>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
    C: Clock,
{
    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            order: RecencyList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            default_ttl: DEFAULT_TTL,
            clock,
        }
    }

    /// Creates an empty store from a validated configuration and a clock.
    pub fn from_config_with_clock(config: &CacheConfig, clock: C) -> Result<Self> {
        let capacity = config.validate()?;
        let mut store = Self::with_clock(capacity, clock);
        store.default_ttl = config.default_ttl();
        Ok(store)
    }

    // == Get ==
    /// Retrieves a live value by key and marks it most recently used.
    ///
    /// Returns `None` for an absent key. An expired entry is removed on the
    /// spot and also yields `None`, so the store can shrink during a read.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let Some(id) = self.index.get(key).copied() else {
            self.stats.record_miss();
            return None;
        };

        if self.is_expired(id, now) {
            self.drop_expired(id);
            self.stats.record_miss();
            return None;
        }

        self.order.move_to_front(id);
        self.stats.record_hit();
        let entry = self.order.get(id)?;
        trace!(key = ?entry.key, "cache hit");
        Some(entry.value.clone())
    }

    // == Put ==
    /// Stores a key-value pair expiring `ttl` from now.
    ///
    /// A live key keeps its slot: value and expiry are refreshed in place and
    /// the entry moves to the front. An expired key is dropped and written as
    /// a brand-new entry. A zero `ttl` is clamped to `MIN_TTL`, so the write
    /// lands but the entry is expired on any later access.
    ///
    /// Afterwards, entries are evicted from the back until the store fits its
    /// capacity. Eviction ignores expiry: a live entry can go for being least
    /// recently used while an expired one nearer the front stays.
    pub fn put(&mut self, key: K, value: V, ttl: Duration) {
        let ttl = normalize_ttl(ttl);
        let now = self.clock.now();

        match self.index.get(&key).copied() {
            Some(id) if self.is_expired(id, now) => {
                self.drop_expired(id);
                self.insert_fresh(key, value, now, ttl);
            }
            Some(id) => {
                if let Some(entry) = self.order.get_mut(id) {
                    entry.renew(value, now, ttl);
                }
                self.order.move_to_front(id);
                self.stats.record_update();
            }
            None => self.insert_fresh(key, value, now, ttl),
        }

        self.enforce_capacity();
        self.stats.set_total_entries(self.order.len());
    }

    // == Set ==
    /// Stores a key-value pair with the store's default TTL.
    pub fn set(&mut self, key: K, value: V) {
        let ttl = self.default_ttl;
        self.put(key, value, ttl);
    }

    // == Remove ==
    /// Removes an entry by key, returning its value even if it had expired.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        let entry = self.order.remove(id)?;
        self.stats.set_total_entries(self.order.len());
        Some(entry.value)
    }

    // == Contains ==
    /// Checks for a live entry without touching recency or evicting.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key, self.clock.now()).is_some()
    }

    // == Peek ==
    /// Returns a live value without touching recency or evicting.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.live_entry(key, self.clock.now())
            .map(|entry| &entry.value)
    }

    // == Time To Live ==
    /// Returns how long a live entry has left.
    ///
    /// Entries written with a TTL past the clock's range report `Duration::MAX`.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.live_entry(key, now)
            .map(|entry| entry.ttl_remaining_at(now))
    }

    /// Returns keys from most to least recently used, expired ones included.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries kept after a put.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the TTL applied by `set`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn live_entry<Q>(&self, key: &Q, now: Instant) -> Option<&CacheEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.get(key)?;
        self.order
            .get(*id)
            .filter(|entry| !entry.is_expired_at(now))
    }

    fn is_expired(&self, id: SlotId, now: Instant) -> bool {
        self.order
            .get(id)
            .map_or(true, |entry| entry.is_expired_at(now))
    }

    fn drop_expired(&mut self, id: SlotId) {
        if let Some(entry) = self.order.remove(id) {
            self.index.remove(&entry.key);
            self.stats.record_expiration();
            debug!(key = ?entry.key, "lazily removed expired entry");
        }
        self.stats.set_total_entries(self.order.len());
    }

    fn insert_fresh(&mut self, key: K, value: V, now: Instant, ttl: Duration) {
        let id = self
            .order
            .push_front(CacheEntry::new(key.clone(), value, now, ttl));
        self.index.insert(key, id);
        self.stats.record_insert();
    }

    fn enforce_capacity(&mut self) {
        while self.order.len() > self.capacity {
            let Some(entry) = self.order.pop_back() else {
                break;
            };
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            debug!(
                key = ?entry.key,
                capacity = self.capacity,
                "evicted least recently used entry"
            );
        }
    }
}

/// Clamps a zero TTL to `MIN_TTL`.
fn normalize_ttl(ttl: Duration) -> Duration {
    if ttl.is_zero() {
        debug!(clamped_to = ?MIN_TTL, "non-positive TTL clamped, entry expires on next access");
        MIN_TTL
    } else {
        ttl
    }
}
