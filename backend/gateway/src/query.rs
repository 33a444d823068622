//! Query-string helpers.

use std::collections::HashMap;

use rsvp_core::{Parameter, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Typed access to query-string values with defaults for absent or unparsable entries.
pub struct QueryHelper {
    values: HashMap<String, String>,
}

impl QueryHelper {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => default.to_string(),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// `sort` / `limit` / `offset` as a listing parameter.
    pub fn parameter(&self) -> Parameter {
        Parameter::new(
            self.get_string("sort", ""),
            self.get_int("limit", DEFAULT_LIMIT),
            self.get_int("offset", DEFAULT_OFFSET),
        )
    }
}
