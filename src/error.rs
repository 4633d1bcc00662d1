//! Matchday error types

use std::time::Duration;

/// Matchday error types
#[derive(Debug, thiserror::Error)]
pub enum MatchdayError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// The upstream body did not match the expected envelope shape.
    #[error("invalid upstream response: {0}")]
    Schema(String),

    /// A 200 response whose `errors` field is populated.
    #[error("API Error: {0}")]
    Upstream(String),

    #[error("failed to make request after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<MatchdayError>,
    },

    // Caller errors
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NoData(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MatchdayError {
    /// Whether the retry loop may try the request again.
    ///
    /// Network faults, 5xx responses, malformed envelopes and upstream
    /// rate limiting are transient. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            MatchdayError::Http(_)
            | MatchdayError::Schema(_)
            | MatchdayError::RateLimited { .. } => true,
            MatchdayError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-advised delay carried by a `RateLimited` error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MatchdayError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Whether this error was raised locally before any upstream call.
    pub fn is_validation(&self) -> bool {
        matches!(self, MatchdayError::InvalidInput(_))
    }
}

/// Result type alias for Matchday operations
pub type Result<T> = std::result::Result<T, MatchdayError>;
