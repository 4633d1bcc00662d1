//! HTTP client for the API-Sports football endpoints.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::envelope::ApiResponse;
use super::rate_limit::RateLimiter;
use super::retry::{RetryConfig, with_retry};
use crate::types::QueryParams;
use crate::{MatchdayError, Result};

/// Default base URL for the API-Sports football API.
pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Host header value expected by the upstream gateway.
pub const DEFAULT_API_HOST: &str = "v3.football.api-sports.io";

/// Per-request network timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

/// Connection settings for the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_host: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another server (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(MatchdayError::Configuration(
                "upstream timeout must be greater than zero".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(MatchdayError::Configuration(
                "upstream base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rate-limited, retrying client for the upstream REST API.
///
/// The underlying `reqwest::Client` is built once here and shared by all
/// fetches; its connection pool is the only shared network state.
#[derive(Debug, Clone)]
pub struct ApiSportsClient {
    http: Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
    retry: RetryConfig,
}

impl ApiSportsClient {
    pub fn new(
        api_key: &str,
        config: &UpstreamConfig,
        limiter: Arc<RateLimiter>,
        retry: RetryConfig,
    ) -> Result<Self> {
        config.validate()?;
        retry.validate()?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key).map_err(|_| {
            MatchdayError::Configuration("API key contains invalid header characters".to_string())
        })?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(
            API_HOST_HEADER,
            HeaderValue::from_str(&config.api_host).map_err(|_| {
                MatchdayError::Configuration(format!("invalid API host: {}", config.api_host))
            })?,
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| MatchdayError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter,
            retry,
        })
    }

    /// Shared budget guarding every attempt.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// GET `endpoint` with `params`, rate limited and retried.
    pub async fn fetch(&self, endpoint: &str, params: &QueryParams) -> Result<ApiResponse> {
        with_retry(&self.retry, &self.limiter, endpoint, || {
            self.send_once(endpoint, params)
        })
        .await
    }

    /// A single attempt: no limiter, no retry.
    async fn send_once(&self, endpoint: &str, params: &QueryParams) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, endpoint);
        let query: Vec<(&str, &str)> = params.iter().collect();

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| MatchdayError::Http(e.to_string()))?;

        log_quota_headers(&response);
        let status = response.status();
        let retry_after = parse_retry_after(&response);

        let body = response
            .text()
            .await
            .map_err(|e| MatchdayError::Http(e.to_string()))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MatchdayError::RateLimited { retry_after });
        }
        if status != StatusCode::OK {
            return Err(MatchdayError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| MatchdayError::Schema(e.to_string()))?;

        if let Some(message) = parsed.errors.message() {
            return Err(MatchdayError::Upstream(message));
        }

        debug!(endpoint, results = parsed.results, "upstream response parsed");
        Ok(parsed)
    }
}

fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn log_quota_headers(response: &Response) {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    let remaining = header("x-ratelimit-requests-remaining");
    let limit = header("x-ratelimit-requests-limit");
    if remaining.is_some() || limit.is_some() {
        debug!(
            remaining = remaining.as_deref().unwrap_or("?"),
            limit = limit.as_deref().unwrap_or("?"),
            "upstream daily quota"
        );
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Upstream `message` field if the body is JSON, else the raw body text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        if !message.trim().is_empty() {
            return message;
        }
    }
    let text = body.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"message":"Endpoint not found"}"#);
        assert_eq!(msg, "Endpoint not found");
    }

    #[test]
    fn error_message_falls_back_to_body_text() {
        let msg = error_message(StatusCode::FORBIDDEN, "forbidden plan");
        assert_eq!(msg, "forbidden plan");
    }

    #[test]
    fn error_message_falls_back_to_reason() {
        let msg = error_message(StatusCode::UNAUTHORIZED, "  ");
        assert_eq!(msg, "Unauthorized");
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = UpstreamConfig::new().timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
