//! The JSON envelope every API-Sports endpoint responds with.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard upstream response wrapper.
///
/// `get`, `results` and `response` are required; a body without them is a
/// schema failure. `errors` may be an empty list, a list of strings, or an
/// object keyed by parameter name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Echo of the requested endpoint.
    pub get: String,
    #[serde(default)]
    pub parameters: Value,
    #[serde(default)]
    pub errors: ApiErrors,
    pub results: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
    pub response: Vec<Value>,
}

/// Pagination block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

/// Application-level errors reported inside a 200 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrors {
    List(Vec<Value>),
    Map(Map<String, Value>),
    Text(String),
}

impl Default for ApiErrors {
    fn default() -> Self {
        ApiErrors::List(Vec::new())
    }
}

impl ApiErrors {
    /// Joined error text, or `None` when nothing meaningful is reported.
    ///
    /// Lists are joined with `"; "`, objects as `"key: value"` pairs.
    /// Null, empty and blank entries are skipped.
    pub fn message(&self) -> Option<String> {
        let parts: Vec<String> = match self {
            ApiErrors::List(items) => items.iter().filter_map(render).collect(),
            ApiErrors::Map(map) => map
                .iter()
                .filter_map(|(key, value)| render(value).map(|v| format!("{key}: {v}")))
                .collect(),
            ApiErrors::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            }
        };
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}
