//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::SportsGateway;
use crate::cache::{CacheConfig, ResponseCache, Sweeper};
use crate::config::{Config, Secrets};
use crate::upstream::{ApiSportsClient, RateLimitConfig, RateLimiter, RetryConfig, UpstreamConfig};
use crate::{MatchdayError, Result};

/// Main entry point for creating gateway instances.
pub struct Matchday;

impl Matchday {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> MatchdayBuilder {
        MatchdayBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// ```rust,no_run
/// use matchday::{Matchday, SportsData, TeamsQuery};
///
/// #[tokio::main]
/// async fn main() -> matchday::Result<()> {
///     let gateway = Matchday::builder().api_key("your-key").build()?;
///     let envelope = gateway.teams(TeamsQuery::default().search("Manchester")).await;
///     println!("{}", serde_json::to_string_pretty(&envelope)?);
///     gateway.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatchdayBuilder {
    api_key: Option<String>,
    upstream: UpstreamConfig,
    rate_limit: RateLimitConfig,
    retry: RetryConfig,
    cache: CacheConfig,
}

impl MatchdayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a loaded configuration file and secrets.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Self {
        Self {
            api_key: secrets.api_key(),
            upstream: config.upstream_config(),
            rate_limit: config.rate_limit_config(),
            retry: config.retry_config(),
            cache: config.cache_config(),
        }
    }

    /// Upstream API key, sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the upstream base URL (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.upstream = self.upstream.base_url(url);
        self
    }

    /// Set the network timeout for each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.upstream = self.upstream.timeout(timeout);
        self
    }

    pub fn upstream(mut self, config: UpstreamConfig) -> Self {
        self.upstream = config;
        self
    }

    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Build without a response cache.
    pub fn disable_cache(mut self) -> Self {
        self.cache.enabled = false;
        self
    }

    /// Build the gateway.
    ///
    /// The HTTP client, limiter and cache are created here, once. When a
    /// Tokio runtime is running, the cache sweeper is spawned on it.
    pub fn build(self) -> Result<SportsGateway> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MatchdayError::Configuration("no API key configured".to_string()))?;

        self.rate_limit.validate()?;
        self.cache.validate()?;

        let limiter = Arc::new(RateLimiter::new(&self.rate_limit));
        let client = ApiSportsClient::new(&api_key, &self.upstream, limiter, self.retry)?;

        let (cache, sweeper) = if self.cache.enabled {
            let cache = Arc::new(ResponseCache::new(
                self.cache.max_entries,
                self.cache.ttls.clone(),
            ));
            let sweeper = match tokio::runtime::Handle::try_current() {
                Ok(_) => Some(Sweeper::spawn(
                    Arc::clone(&cache),
                    self.cache.cleanup_interval,
                )),
                Err(_) => {
                    debug!("no tokio runtime, cache sweeper not started");
                    None
                }
            };
            (Some(cache), sweeper)
        } else {
            (None, None)
        };

        info!(
            base_url = %self.upstream.base_url,
            calls_per_minute = self.rate_limit.calls_per_minute,
            calls_per_day = self.rate_limit.calls_per_day,
            cache_enabled = cache.is_some(),
            "gateway built"
        );

        Ok(SportsGateway::new(client, cache, sweeper))
    }
}
