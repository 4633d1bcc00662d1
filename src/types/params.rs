//! Canonical query parameter set.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

/// Normalised upstream query parameters.
///
/// Absent values and empty (or whitespace-only) strings are dropped on
/// insertion; everything else is stored stringified and sorted by key. The
/// same value feeds the upstream query string and the cache key, so two
/// semantically identical requests always produce the same form regardless
/// of how they were assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless it is absent or empty.
    pub fn insert<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.0.insert(key.to_string(), value);
            }
        }
        self
    }

    /// Chaining variant of [`insert`](Self::insert).
    pub fn with<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical serialisation: a JSON object with sorted keys.
    ///
    /// Keys and values are JSON-escaped, so values containing `&` or `=`
    /// cannot be mistaken for extra parameters. [`Display`](fmt::Display)
    /// renders the unescaped `k=v&k=v` form for logs.
    pub fn canonical(&self) -> String {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map).to_string()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            let key: String = key.into();
            params.insert(&key, Some(value.into()));
        }
        params
    }
}
