//! SportsGateway - cache, fetch and store composition

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::cache::{CacheStats, ResponseCache, Sweeper, cache_key, category_for};
use crate::convert::reshape;
use crate::types::{CacheStatus, Envelope, SportsQuery, Validate};
use crate::upstream::{ApiSportsClient, RemainingBudget};
use crate::{Result, SportsData};

/// In-process gateway in front of the upstream API.
///
/// Owns the HTTP client, the shared rate limiter (through the client) and
/// the response cache. Built by [`MatchdayBuilder`](crate::MatchdayBuilder).
#[derive(Debug)]
pub struct SportsGateway {
    client: ApiSportsClient,
    cache: Option<Arc<ResponseCache>>,
    sweeper: Option<Sweeper>,
}

impl SportsGateway {
    pub(crate) fn new(
        client: ApiSportsClient,
        cache: Option<Arc<ResponseCache>>,
        sweeper: Option<Sweeper>,
    ) -> Self {
        Self {
            client,
            cache,
            sweeper,
        }
    }

    /// Run `query`: validate, consult the cache, fetch on a miss, reshape,
    /// and store the result under its category.
    ///
    /// Validation failures return before the cache or the limiter is
    /// touched.
    pub async fn query(&self, query: &SportsQuery) -> Result<(Value, CacheStatus)> {
        query.validate()?;

        let operation = query.operation();
        let params = query.to_params();
        let cache = if query.bypasses_cache() {
            None
        } else {
            self.cache.as_deref()
        };
        let key = cache_key(operation, &params);

        if let Some(cache) = cache {
            if let Some(hit) = cache.get(&key) {
                debug!("returning cached result");
                return Ok((hit, CacheStatus::Hit));
            }
        }

        info!(params = %params, "querying upstream");
        let response = self.client.fetch(operation.endpoint(), &params).await?;
        let data = reshape(query, &response)?;

        let status = match cache {
            Some(cache) => {
                match category_for(operation, &response.response) {
                    Some(category) => cache.set(&key, data.clone(), category),
                    None => debug!("result not cacheable"),
                }
                CacheStatus::Miss
            }
            None => CacheStatus::Bypass,
        };
        info!(results = response.results, "query complete");
        Ok((data, status))
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_deref()
    }

    /// Remove cached entries whose key contains `pattern` (all when `None`).
    pub fn invalidate_cache(&self, pattern: Option<&str>) -> usize {
        self.cache.as_ref().map_or(0, |c| c.invalidate(pattern))
    }

    /// Run one expiry sweep now.
    pub fn cleanup_expired(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.cleanup_expired())
    }

    pub fn has_sweeper(&self) -> bool {
        self.sweeper.as_ref().is_some_and(Sweeper::is_running)
    }

    /// Stop the background sweeper and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
        info!("gateway shut down");
    }
}

#[async_trait]
impl SportsData for SportsGateway {
    async fn execute(&self, query: &SportsQuery) -> Envelope {
        let request_id = Uuid::new_v4().to_string();
        let operation = query.operation();
        let span = info_span!("query", request_id = %request_id, operation = operation.tag());

        async {
            match self.query(query).await {
                Ok((data, status)) => Envelope::success(request_id.as_str(), data, status),
                Err(e) => {
                    if e.is_validation() {
                        warn!(error = %e, "query rejected");
                    } else {
                        error!(error = %e, "query failed");
                    }
                    Envelope::failure(request_id.as_str(), operation, &e)
                }
            }
        }
        .instrument(span)
        .await
    }

    fn remaining_budget(&self) -> RemainingBudget {
        self.client.limiter().get_remaining()
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }
}
