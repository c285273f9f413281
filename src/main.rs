//! Lazy LRU demo
//!
//! Walks through eviction, renewal and re-insertion against the real
//! monotonic clock, then prints the combined statistics as JSON.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lazy_lru::{CacheStats, CacheStore, SharedCache};

type DemoCache = SharedCache<u32, u32>;

/// Runs the three demo scenarios.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Run LRU + TTL eviction scenario
/// 3. Run TTL renewal scenario
/// 4. Run re-insertion after expiry scenario
/// 5. Print merged statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazy_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let eviction = eviction_demo().await?;
    let renewal = renewal_demo().await?;
    let reinsert = reinsert_demo().await?;

    let totals = merge_stats(&[eviction, renewal, reinsert]);
    let json = serde_json::to_string_pretty(&totals).context("serializing stats")?;
    println!("{json}");

    Ok(())
}

/// LRU + TTL with capacity 2.
async fn eviction_demo() -> anyhow::Result<CacheStats> {
    info!("== Demo 1: LRU + TTL (capacity=2)");
    let cache = DemoCache::new(CacheStore::try_new(2)?);

    cache.put(1, 100, Duration::from_millis(500)).await;
    cache.put(2, 200, Duration::from_secs(2)).await;
    let hit = cache.get(&1).await;
    info!(result = ?hit, "Get(1), refreshes recency");

    // Over capacity, key 2 is least recently used
    cache.put(3, 300, Duration::from_secs(2)).await;
    let hit = cache.get(&2).await;
    info!(result = ?hit, "Get(2) after Put(3)");
    let hit = cache.get(&3).await;
    info!(result = ?hit, "Get(3)");

    info!("Sleeping 600ms so key 1 (TTL 500ms) expires");
    tokio::time::sleep(Duration::from_millis(600)).await;

    let hit = cache.get(&1).await;
    info!(result = ?hit, "Get(1), lazily expired");
    let hit = cache.get(&3).await;
    info!(result = ?hit, "Get(3), still live");

    Ok(cache.stats().await)
}

/// Renewing a TTL by writing the same key again.
async fn renewal_demo() -> anyhow::Result<CacheStats> {
    info!("== Demo 2: TTL renewal through Put");
    let cache = DemoCache::new(CacheStore::try_new(2)?);

    cache.put(10, 1000, Duration::from_millis(120)).await;
    tokio::time::sleep(Duration::from_millis(80)).await;

    cache.put(10, 1001, Duration::from_millis(250)).await;
    info!("Renewed key 10 with value 1001 and TTL 250ms");

    tokio::time::sleep(Duration::from_millis(150)).await;
    let hit = cache.get(&10).await;
    info!(result = ?hit, "Get(10), 150ms after renewal");

    tokio::time::sleep(Duration::from_millis(120)).await;
    let hit = cache.get(&10).await;
    info!(result = ?hit, "Get(10), 270ms after renewal");

    Ok(cache.stats().await)
}

/// Writing a key again once its entry has expired.
async fn reinsert_demo() -> anyhow::Result<CacheStats> {
    info!("== Demo 3: re-insertion after expiry");
    let cache = DemoCache::new(CacheStore::try_new(2)?);

    cache.put(1, 100, Duration::from_millis(50)).await;
    tokio::time::sleep(Duration::from_millis(70)).await;

    cache.put(1, 101, Duration::from_millis(300)).await;
    let hit = cache.get(&1).await;
    info!(result = ?hit, "Get(1) after re-insertion");

    Ok(cache.stats().await)
}

fn merge_stats(all: &[CacheStats]) -> CacheStats {
    all.iter().fold(CacheStats::new(), |mut acc, stats| {
        acc.hits += stats.hits;
        acc.misses += stats.misses;
        acc.expirations += stats.expirations;
        acc.evictions += stats.evictions;
        acc.inserts += stats.inserts;
        acc.updates += stats.updates;
        acc.total_entries += stats.total_entries;
        acc
    })
}
