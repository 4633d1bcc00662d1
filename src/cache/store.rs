//! Bounded LRU store with per-entry expiry.
//!
//! All operations take one short synchronous lock; nothing here awaits, so
//! the store can be shared freely between tasks behind an `Arc`.

use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{CacheCategory, CacheTtls};
use crate::telemetry;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// `None` never expires.
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    hits: u64,
    misses: u64,
    evictions: u64,
}

#[derive(Debug)]
struct Inner<V> {
    entries: LruCache<String, Entry<V>>,
    counters: Counters,
}

/// Snapshot of cache counters, as reported by [`CacheStore::stats()`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_requests: u64,
    /// Hits as a percentage of lookups, 0.0 before the first lookup.
    pub hit_rate: f64,
}

/// Thread-safe LRU + TTL store keyed on strings.
///
/// Reads promote the entry to most-recently-used, expired entries are
/// removed when read, and inserting into a full store evicts the least
/// recently used entry first.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
    max_size: usize,
    ttls: CacheTtls,
}

impl<V: Clone> CacheStore<V> {
    /// Create a store holding at most `max_size` entries (minimum 1).
    pub fn new(max_size: usize, ttls: CacheTtls) -> Self {
        let cap = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(cap),
                counters: Counters::default(),
            }),
            max_size: cap.get(),
            ttls,
        }
    }

    /// Look up `key`, counting a hit or a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let Inner { entries, counters } = &mut *guard;

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                counters.hits += 1;
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            debug!(key, "cache miss (expired)");
        } else {
            debug!(key, "cache miss");
        }
        counters.misses += 1;
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        None
    }

    /// Store `value` under `key` with the TTL configured for `category`.
    pub fn set(&self, key: &str, value: V, category: CacheCategory) {
        let ttl = self.ttls.get(category);
        self.insert(key, value, ttl);
        debug!(key, category = category.as_str(), ttl_secs = ttl.as_secs(), "cache set");
    }

    /// Store `value` under `key`. A zero `ttl` stores it permanently.
    ///
    /// Overwriting replaces the entry and makes it most recently used.
    pub fn insert(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };
        let mut guard = self.inner.lock();
        let Inner { entries, counters } = &mut *guard;

        if !entries.contains(key) {
            while entries.len() >= self.max_size {
                let Some((evicted, _)) = entries.pop_lru() else {
                    break;
                };
                counters.evictions += 1;
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
                debug!(key = %evicted, "cache eviction");
            }
        }
        entries.put(key.to_string(), Entry { value, expires_at });
    }

    /// Remove entries whose key contains `pattern`, or everything when
    /// `pattern` is `None`. Returns the number removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut guard = self.inner.lock();
        let Some(pattern) = pattern else {
            let count = guard.entries.len();
            guard.entries.clear();
            info!(count, "cache cleared");
            return count;
        };

        let doomed: Vec<String> = guard
            .entries
            .iter()
            .filter(|(key, _)| key.contains(pattern))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            guard.entries.pop(key);
        }
        info!(count = doomed.len(), pattern, "cache invalidated");
        doomed.len()
    }

    /// Drop every expired entry regardless of access. Returns the number
    /// removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.inner.lock();
        let expired: Vec<String> = guard
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            guard.entries.pop(key);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), "cleaned up expired cache entries");
        }
        expired.len()
    }

    pub fn stats(&self) -> CacheStats {
        let guard = self.inner.lock();
        let Counters {
            hits,
            misses,
            evictions,
        } = guard.counters;
        let total_requests = hits + misses;
        let hit_rate = if total_requests == 0 {
            0.0
        } else {
            hits as f64 / total_requests as f64 * 100.0
        };
        CacheStats {
            size: guard.entries.len(),
            max_size: self.max_size,
            hits,
            misses,
            evictions,
            total_requests,
            hit_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is physically present, without touching recency,
    /// expiry or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().entries.contains(key)
    }

    /// Expiry of the entry under `key` without touching recency or counters.
    ///
    /// `Some(None)` is a permanent entry; `None` means no entry.
    pub fn peek_expiry(&self, key: &str) -> Option<Option<Instant>> {
        self.inner.lock().entries.peek(key).map(|e| e.expires_at)
    }

    pub fn ttls(&self) -> &CacheTtls {
        &self.ttls
    }
}
