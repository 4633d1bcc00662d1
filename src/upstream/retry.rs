//! Retry configuration, delay calculation, and the shared attempt loop.
//!
//! [`with_retry()`] is the single place where upstream attempts are
//! sequenced. Each attempt first acquires a slot from the
//! [`RateLimiter`]; the outcome of the attempt then decides what happens
//! next:
//!
//! | outcome | action | consumes an attempt |
//! |---|---|---|
//! | `Ok` | return | - |
//! | `RateLimited` (429) | sleep `retry_after` or the default, retry | no |
//! | other transient (5xx, network, schema) | sleep `unit * factor^attempt`, retry | yes |
//! | permanent | return the error | - |
//!
//! Running out of attempts yields [`MatchdayError::RetriesExhausted`] with
//! the last per-attempt error as its source.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::rate_limit::RateLimiter;
use crate::telemetry;
use crate::{MatchdayError, Result};

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use matchday::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .backoff_factor(1.5)
///     .default_retry_after(Duration::from_secs(30));
/// assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request) that
    /// transient faults may consume. 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Multiplier for exponential backoff. Default: 2.0.
    pub backoff_factor: f64,
    /// Base unit the backoff multiplier is applied to. Default: 1s.
    pub backoff_unit: Duration,
    /// Wait applied to a 429 response without a `Retry-After` header.
    /// Default: 60s.
    pub default_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: 2.0,
            backoff_unit: Duration::from_secs(1),
            default_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    ///
    /// Upstream 429 responses are still honoured.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the exponential backoff multiplier.
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the base unit the multiplier is applied to.
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Set the wait used when a 429 carries no `Retry-After`.
    pub fn default_retry_after(mut self, delay: Duration) -> Self {
        self.default_retry_after = delay;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(MatchdayError::Configuration(format!(
                "backoff factor must be a finite number >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        Ok(())
    }

    /// Backoff before the retry following failed attempt `attempt` (0-indexed).
    ///
    /// `backoff_unit * backoff_factor ^ attempt`, saturating at `Duration::MAX`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_unit.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Wait applied to an upstream 429 response.
    pub fn throttle_delay(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or(self.default_retry_after)
    }
}

/// Execute one logical upstream request with rate limiting and retries.
///
/// `f` performs a single attempt. It is invoked once per attempt, each time
/// after [`RateLimiter::acquire()`] has returned, so retries and 429
/// compliance waits are charged against the budget like any other call.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    limiter: &RateLimiter,
    endpoint: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let started = Instant::now();
    let mut attempt: u32 = 0;

    let outcome = loop {
        limiter.acquire().await;
        debug!(endpoint, attempt = attempt + 1, max_attempts, "dispatching upstream request");

        let result = f().await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_owned(),
            "status" => status,
        )
        .increment(1);

        match result {
            Ok(value) => break Ok(value),
            Err(MatchdayError::RateLimited { retry_after }) => {
                metrics::counter!(telemetry::UPSTREAM_THROTTLED_TOTAL, "endpoint" => endpoint.to_owned())
                    .increment(1);
                let delay = config.throttle_delay(retry_after);
                warn!(
                    endpoint,
                    attempt = attempt + 1,
                    retry_after_secs = delay.as_secs_f64(),
                    "upstream rate limited, waiting"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_transient() => {
                metrics::counter!(telemetry::RETRIES_TOTAL, "endpoint" => endpoint.to_owned())
                    .increment(1);
                if attempt + 1 >= max_attempts {
                    error!(endpoint, attempts = attempt + 1, error = %e, "retries exhausted");
                    break Err(MatchdayError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(e),
                    });
                }
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_attempts,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(endpoint, attempt = attempt + 1, error = %e, "upstream request failed");
                break Err(e);
            }
        }
    };

    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "endpoint" => endpoint.to_owned())
        .record(started.elapsed().as_secs_f64());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_by_factor() {
        let config = RetryConfig::new().backoff_factor(2.0);
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn delay_scales_with_unit() {
        let config = RetryConfig::new().backoff_unit(Duration::from_millis(10));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(80));
    }

    #[test]
    fn delay_saturates() {
        let config = RetryConfig::new().backoff_factor(10.0);
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::MAX);
    }

    #[test]
    fn throttle_delay_prefers_server_hint() {
        let config = RetryConfig::new();
        assert_eq!(
            config.throttle_delay(Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
        assert_eq!(config.throttle_delay(None), Duration::from_secs(60));
    }

    #[test]
    fn backoff_factor_below_one_rejected() {
        assert!(RetryConfig::new().backoff_factor(0.5).validate().is_err());
        assert!(RetryConfig::new().backoff_factor(f64::NAN).validate().is_err());
        assert!(RetryConfig::new().validate().is_ok());
    }
}
