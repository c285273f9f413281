//! Property-Based Tests for Cache Module
//!
//! Drives the store with random operation sequences under a manual clock and
//! compares it against a naive vector model of the same policy.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{CacheStore, ManualClock};

// == Strategies ==
/// Small key space so that operations collide often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..12
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32, ttl_ms: u64 },
    Get { key: u8 },
    Advance { ms: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>(), 0u64..200)
            .prop_map(|(key, value, ttl_ms)| CacheOp::Put { key, value, ttl_ms }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => (0u64..150).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

// == Reference Model ==
/// Front of `entries` is most recently used. Times are in nanoseconds since
/// the start of the run; a zero TTL becomes one nanosecond.
struct Model {
    capacity: usize,
    now: u64,
    entries: Vec<(u8, u32, u64)>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            now: 0,
            entries: Vec::new(),
        }
    }

    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _, _)| *k == key)
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        let (k, v, expires_at) = self.entries.remove(pos);
        if self.now > expires_at {
            return None;
        }
        self.entries.insert(0, (k, v, expires_at));
        Some(v)
    }

    fn put(&mut self, key: u8, value: u32, ttl_ms: u64) {
        let ttl_ns = (ttl_ms * 1_000_000).max(1);
        if let Some(pos) = self.position(key) {
            self.entries.remove(pos);
        }
        self.entries.insert(0, (key, value, self.now + ttl_ns));
        self.entries.truncate(self.capacity);
    }

    fn keys(&self) -> Vec<u8> {
        self.entries.iter().map(|(k, _, _)| *k).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The store never holds more than `capacity` entries after a put.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 0usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(capacity, clock.clone());

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl_ms } => {
                    store.put(key, value, Duration::from_millis(ttl_ms));
                    prop_assert!(
                        store.len() <= capacity,
                        "Cache size {} exceeds capacity {}",
                        store.len(),
                        capacity
                    );
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Advance { ms } => clock.advance(Duration::from_millis(ms)),
            }
        }
    }

    // Index and recency list always agree: one slot per key, no duplicates.
    #[test]
    fn prop_index_and_order_consistent(
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(5, clock.clone());

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl_ms } => {
                    store.put(key, value, Duration::from_millis(ttl_ms));
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Advance { ms } => clock.advance(Duration::from_millis(ms)),
            }

            let keys = store.keys_by_recency();
            let unique: HashSet<u8> = keys.iter().copied().collect();
            prop_assert_eq!(keys.len(), store.len(), "Order length mismatch");
            prop_assert_eq!(unique.len(), keys.len(), "Duplicate key in order");
            prop_assert_eq!(store.stats().total_entries, store.len());
        }
    }

    // Every lookup and the final recency order match the naive model.
    #[test]
    fn prop_matches_reference_model(
        capacity in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..150)
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(capacity, clock.clone());
        let mut model = Model::new(capacity);

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl_ms } => {
                    store.put(key, value, Duration::from_millis(ttl_ms));
                    model.put(key, value, ttl_ms);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(key), "Get({}) diverged", key);
                }
                CacheOp::Advance { ms } => {
                    clock.advance(Duration::from_millis(ms));
                    model.now += ms * 1_000_000;
                }
            }
            prop_assert_eq!(store.keys_by_recency(), model.keys());
        }
    }

    // Hits and misses add up to the number of gets issued.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(4, clock.clone());
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value, ttl_ms } => {
                    store.put(key, value, Duration::from_millis(ttl_ms));
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Advance { ms } => clock.advance(Duration::from_millis(ms)),
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // Filling a full cache with one more distinct key evicts exactly the
    // least recently touched key.
    #[test]
    fn prop_lru_evicts_least_recently_touched(
        capacity in 1usize..10,
        touches in prop::collection::vec(any::<prop::sample::Index>(), 0..20)
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(capacity, clock);
        let long = Duration::from_secs(3600);

        let mut recency: Vec<u32> = Vec::new();
        for key in 0..capacity as u32 {
            store.put(key, key, long);
            recency.insert(0, key);
        }
        for touch in touches {
            let key = touch.index(capacity) as u32;
            prop_assert_eq!(store.get(&key), Some(key));
            recency.retain(|k| *k != key);
            recency.insert(0, key);
        }

        let victim = *recency.last().unwrap();
        store.put(u32::MAX, 0, long);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains(&victim), "Expected {} to be evicted", victim);
        for key in recency.iter().filter(|k| **k != victim) {
            prop_assert!(store.contains(key), "Key {} evicted out of order", key);
        }
    }
}

// Renewal and expiry properties run against the manual clock, so they need
// no sleeping.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A second put on a live key re-anchors expiry on the second call.
    #[test]
    fn prop_renewal_reanchors_ttl(
        first_ttl in 10u64..500,
        wait in 0u64..10,
        second_ttl in 10u64..500,
        value1 in any::<u32>(),
        value2 in any::<u32>()
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(4, clock.clone());

        store.put("k", value1, Duration::from_millis(first_ttl));
        clock.advance(Duration::from_millis(wait));
        store.put("k", value2, Duration::from_millis(second_ttl));
        prop_assert_eq!(store.len(), 1);

        clock.advance(Duration::from_millis(second_ttl));
        prop_assert_eq!(store.get("k"), Some(value2), "Live at the renewed deadline");

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(store.get("k"), None, "Expired past the renewed deadline");
        prop_assert!(store.is_empty());
    }

    // A get strictly after expiry misses and shrinks the store by one.
    #[test]
    fn prop_expired_get_shrinks_store(
        ttl in 1u64..1000,
        others in 0usize..5
    ) {
        let clock = ManualClock::new();
        let mut store = CacheStore::with_clock(8, clock.clone());

        for key in 0..others as u32 {
            store.put(key, key, Duration::from_secs(3600));
        }
        store.put(u32::MAX, 1, Duration::from_millis(ttl));
        let before = store.len();

        clock.advance(Duration::from_millis(ttl + 1));
        prop_assert_eq!(store.get(&u32::MAX), None);
        prop_assert_eq!(store.len(), before - 1);
    }
}
