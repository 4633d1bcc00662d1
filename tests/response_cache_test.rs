//! Tests for the TTL/LRU response cache.

use std::sync::Arc;
use std::time::Duration;

use matchday::cache::{Sweeper, cache_key};
use matchday::{CacheCategory, CacheStore, CacheTtls, Operation, QueryParams, ResponseCache};
use serde_json::json;

fn store(max: usize) -> ResponseCache {
    CacheStore::new(max, CacheTtls::default())
}

#[test]
fn set_then_get_returns_value() {
    let cache = store(10);
    cache.set("teams:abc", json!({"count": 1}), CacheCategory::Teams);
    assert_eq!(cache.get("teams:abc"), Some(json!({"count": 1})));
    assert_eq!(cache.get("teams:other"), None);
}

#[tokio::test(start_paused = true)]
async fn entries_expire_after_their_ttl() {
    let cache = store(10);
    cache.insert("k", json!(1), Duration::from_secs(10));

    tokio::time::advance(Duration::from_secs(10)).await;
    assert_eq!(cache.get("k"), Some(json!(1)), "still valid at the boundary");

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get("k"), None);
    assert!(!cache.contains("k"), "expired entry removed on read");
}

#[tokio::test(start_paused = true)]
async fn category_ttls_applied() {
    let cache = store(10);
    cache.set("standings:x", json!([]), CacheCategory::Standings);
    cache.set("fixtures:done", json!([]), CacheCategory::FixturesCompleted);

    tokio::time::advance(Duration::from_secs(1801)).await;
    assert_eq!(cache.get("standings:x"), None);
    assert!(cache.get("fixtures:done").is_some());
}

#[tokio::test(start_paused = true)]
async fn zero_ttl_is_permanent() {
    let cache = store(10);
    cache.insert("forever", json!("ft"), Duration::ZERO);
    assert_eq!(cache.peek_expiry("forever"), Some(None));

    tokio::time::advance(Duration::from_secs(365 * 86_400)).await;
    assert_eq!(cache.get("forever"), Some(json!("ft")));
}

#[test]
fn least_recently_used_entry_evicted() {
    let cache = store(2);
    cache.set("a", json!("a"), CacheCategory::Teams);
    cache.set("b", json!("b"), CacheCategory::Teams);

    // touch "a" so "b" becomes the eviction candidate
    assert!(cache.get("a").is_some());
    cache.set("c", json!("c"), CacheCategory::Teams);

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
    assert_eq!(cache.stats().evictions, 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn overwriting_existing_key_does_not_evict() {
    let cache = store(2);
    cache.set("a", json!(1), CacheCategory::Teams);
    cache.set("b", json!(2), CacheCategory::Teams);
    cache.set("a", json!(3), CacheCategory::Teams);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions, 0);
    assert_eq!(cache.get("a"), Some(json!(3)));
}

#[test]
fn invalidate_by_substring_and_all() {
    let cache = store(10);
    cache.set("teams:1", json!(1), CacheCategory::Teams);
    cache.set("teams:2", json!(2), CacheCategory::Teams);
    cache.set("standings:1", json!(3), CacheCategory::Standings);

    assert_eq!(cache.invalidate(Some("teams:")), 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.invalidate(Some("nothing")), 0);
    assert_eq!(cache.invalidate(None), 1);
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cleanup_removes_only_expired_entries() {
    let cache = store(10);
    cache.insert("short", json!(1), Duration::from_secs(5));
    cache.insert("long", json!(2), Duration::from_secs(500));
    cache.insert("permanent", json!(3), Duration::ZERO);

    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(cache.cleanup_expired(), 1);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().misses, 0, "sweeps do not count as reads");
}

#[test]
fn stats_report_hit_rate_as_percentage() {
    let cache = store(5);
    let empty = cache.stats();
    assert_eq!(empty.total_requests, 0);
    assert_eq!(empty.hit_rate, 0.0);

    cache.set("k", json!(1), CacheCategory::Teams);
    cache.get("k");
    cache.get("k");
    cache.get("k");
    cache.get("missing");

    let stats = cache.stats();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.max_size, 5);
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.total_requests, 4);
    assert!((stats.hit_rate - 75.0).abs() < f64::EPSILON);
}

#[test]
fn zero_capacity_clamped_to_one() {
    let cache = store(0);
    cache.set("a", json!(1), CacheCategory::Teams);
    cache.set("b", json!(2), CacheCategory::Teams);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().max_size, 1);
}

#[test]
fn keys_ignore_parameter_order() {
    let a = QueryParams::new()
        .with("league", Some(39))
        .with("season", Some(2023));
    let b = QueryParams::new()
        .with("season", Some(2023))
        .with("league", Some(39));
    assert_eq!(
        cache_key(Operation::Standings, &a),
        cache_key(Operation::Standings, &b)
    );
    assert!(cache_key(Operation::Standings, &a).starts_with("standings:"));
}

#[tokio::test(start_paused = true)]
async fn sweeper_purges_on_schedule() {
    let cache = Arc::new(store(10));
    cache.insert("k", json!(1), Duration::from_secs(30));
    let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert!(cache.contains("k"));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!cache.contains("k"));

    assert!(sweeper.is_running());
    sweeper.shutdown().await;
}
