//! Response caching subsystem.
//!
//! - [`store::CacheStore`]: bounded LRU map with per-entry expiry and
//!   hit/miss/eviction counters. [`ResponseCache`] is the instance the
//!   gateway uses, holding reshaped JSON documents.
//!
//! - [`key`]: deterministic keys: operation tag plus a digest of the
//!   canonical (JSON-escaped) parameter encoding.
//!
//! - [`policy`]: which TTL category a result is stored under, including
//!   the content-driven decision for fixture lists.
//!
//! - [`sweeper`]: background task that periodically drops expired
//!   entries.
//!
//! The cache is opt-out: the builder allocates it unless
//! [`CacheConfig::enabled`] is false, in which case the gateway holds no
//! cache at all.

pub mod key;
pub mod policy;
pub mod store;
pub mod sweeper;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{MatchdayError, Result};

pub use key::cache_key;
pub use policy::{COMPLETED_STATUSES, category_for, fixtures_category};
pub use store::{CacheStats, CacheStore};
pub use sweeper::{DEFAULT_CLEANUP_INTERVAL, Sweeper};

/// The gateway's response cache.
pub type ResponseCache = CacheStore<serde_json::Value>;

/// TTL category a result is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheCategory {
    Teams,
    FixturesCompleted,
    FixturesUpcoming,
    Statistics,
    Standings,
    Predictions,
    Leagues,
}

impl CacheCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheCategory::Teams => "teams",
            CacheCategory::FixturesCompleted => "fixtures_completed",
            CacheCategory::FixturesUpcoming => "fixtures_upcoming",
            CacheCategory::Statistics => "statistics",
            CacheCategory::Standings => "standings",
            CacheCategory::Predictions => "predictions",
            CacheCategory::Leagues => "leagues",
        }
    }
}

impl fmt::Display for CacheCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-to-live per [`CacheCategory`]. A zero duration means the entry
/// never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTtls {
    pub teams: Duration,
    pub fixtures_completed: Duration,
    pub fixtures_upcoming: Duration,
    pub statistics: Duration,
    pub standings: Duration,
    pub predictions: Duration,
    pub leagues: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            teams: Duration::from_secs(86_400),
            fixtures_completed: Duration::ZERO,
            fixtures_upcoming: Duration::from_secs(3_600),
            statistics: Duration::from_secs(3_600),
            standings: Duration::from_secs(1_800),
            predictions: Duration::from_secs(3_600),
            leagues: Duration::from_secs(86_400),
        }
    }
}

impl CacheTtls {
    pub fn get(&self, category: CacheCategory) -> Duration {
        match category {
            CacheCategory::Teams => self.teams,
            CacheCategory::FixturesCompleted => self.fixtures_completed,
            CacheCategory::FixturesUpcoming => self.fixtures_upcoming,
            CacheCategory::Statistics => self.statistics,
            CacheCategory::Standings => self.standings,
            CacheCategory::Predictions => self.predictions,
            CacheCategory::Leagues => self.leagues,
        }
    }

    /// Override the TTL of a single category.
    pub fn with(mut self, category: CacheCategory, ttl: Duration) -> Self {
        let slot = match category {
            CacheCategory::Teams => &mut self.teams,
            CacheCategory::FixturesCompleted => &mut self.fixtures_completed,
            CacheCategory::FixturesUpcoming => &mut self.fixtures_upcoming,
            CacheCategory::Statistics => &mut self.statistics,
            CacheCategory::Standings => &mut self.standings,
            CacheCategory::Predictions => &mut self.predictions,
            CacheCategory::Leagues => &mut self.leagues,
        };
        *slot = ttl;
        self
    }
}

/// Configuration for the response cache.
///
/// ```rust
/// # use matchday::{CacheCategory, CacheConfig};
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(CacheCategory::Standings, Duration::from_secs(600));
/// assert_eq!(config.ttls.standings, Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether a cache is allocated at all. Default: true.
    pub enabled: bool,
    /// Maximum number of cached entries. Default: 1,000.
    pub max_entries: usize,
    /// Period of the background expiry sweep. Default: 5 minutes.
    pub cleanup_interval: Duration,
    pub ttls: CacheTtls,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1_000,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            ttls: CacheTtls::default(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with caching switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn ttl(mut self, category: CacheCategory, ttl: Duration) -> Self {
        self.ttls = self.ttls.with(category, ttl);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.cleanup_interval.is_zero() {
            return Err(MatchdayError::Configuration(
                "cache cleanup interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
