//! Telemetry metric name constants.
//!
//! Centralised metric names for matchday operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `matchday_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `endpoint`: upstream path (e.g. "/fixtures")
//! - `operation`: query kind (e.g. "teams", "standings")
//! - `status`: outcome: "ok" or "error"
//! - `window`: limiter window: "minute" or "day"

/// Upstream HTTP attempts dispatched (including retries).
///
/// Labels: `endpoint`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "matchday_upstream_requests_total";

/// Duration of a logical fetch, from first acquire to final outcome.
///
/// Labels: `endpoint`.
pub const REQUEST_DURATION_SECONDS: &str = "matchday_request_duration_seconds";

/// Retries caused by transient faults (5xx, network, schema).
///
/// Labels: `endpoint`.
pub const RETRIES_TOTAL: &str = "matchday_retries_total";

/// Upstream 429 responses honoured with a compliance wait.
///
/// Labels: `endpoint`.
pub const UPSTREAM_THROTTLED_TOTAL: &str = "matchday_upstream_throttled_total";

/// Local rate limiter suspensions.
///
/// Labels: `window`.
pub const RATE_LIMIT_WAITS_TOTAL: &str = "matchday_rate_limit_waits_total";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "matchday_cache_hits_total";

/// Total cache misses (including lazily expired entries).
pub const CACHE_MISSES_TOTAL: &str = "matchday_cache_misses_total";

/// Total LRU evictions.
pub const CACHE_EVICTIONS_TOTAL: &str = "matchday_cache_evictions_total";
