//! Result envelope returned across the gateway boundary

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::query::Operation;
use crate::MatchdayError;

/// How the cache took part in answering a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Hit,
    Miss,
    /// Live query, cache skipped on read and write
    Bypass,
}

/// Uniform response for every operation.
///
/// Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(request_id: impl Into<String>, data: Value, cache: CacheStatus) -> Self {
        Self {
            request_id: request_id.into(),
            cache: Some(cache),
            data: Some(data),
            error: None,
        }
    }

    /// Error envelope for a failed operation.
    ///
    /// Validation and no-data errors carry their bare message; everything
    /// else is prefixed with the operation description.
    pub fn failure(request_id: impl Into<String>, operation: Operation, err: &MatchdayError) -> Self {
        let error = match err {
            MatchdayError::InvalidInput(_) | MatchdayError::NoData(_) => err.to_string(),
            other => format!("Failed to {}: {}", operation.description(), other),
        };
        Self {
            request_id: request_id.into(),
            cache: None,
            data: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
