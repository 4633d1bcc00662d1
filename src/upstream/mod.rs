//! Upstream access: call budget, retry loop, HTTP client and response envelope.

mod client;
mod envelope;
mod rate_limit;
mod retry;

pub use client::{
    ApiSportsClient, DEFAULT_API_HOST, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, UpstreamConfig,
};
pub use envelope::{ApiErrors, ApiResponse, Paging};
pub use rate_limit::{DAY_WINDOW, MINUTE_WINDOW, RateLimitConfig, RateLimiter, RemainingBudget};
pub use retry::{RetryConfig, with_retry};
