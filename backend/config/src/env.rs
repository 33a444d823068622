//! Environment variable access.
//!
//! All reads go through an [`EnvMap`] snapshot so tests can supply their own variables
//! without touching process state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Snapshot of environment variables.
pub type EnvMap = HashMap<String, String>;

/// Errors raised while building a [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing env var \"{0}\"")]
    Missing(String),

    #[error("Invalid value {value:?} for env var \"{var}\": expected {expected}")]
    Invalid {
        var: String,
        value: String,
        expected: &'static str,
    },

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("Failed to load .env file: {0}")]
    Dotenv(String),
}

/// Capture the current process environment.
pub fn process_env() -> EnvMap {
    std::env::vars().collect()
}

/// Load `.env` from the working directory (or a parent) if one exists.
///
/// Variables already present in the process environment win. A missing file is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

/// Typed lookups over an [`EnvMap`]. Empty values count as unset.
pub(crate) struct EnvReader<'a> {
    vars: &'a EnvMap,
}

impl<'a> EnvReader<'a> {
    pub(crate) fn new(vars: &'a EnvMap) -> Self {
        Self { vars }
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    pub(crate) fn parse_or<T: FromStr>(
        &self,
        key: &str,
        default: T,
        expected: &'static str,
    ) -> Result<T, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                value: raw,
                expected,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_values_count_as_unset() {
        let vars = env(&[("PORT", "  ")]);
        let reader = EnvReader::new(&vars);
        assert_eq!(reader.get("PORT"), None);
        assert_eq!(reader.get_or("PORT", "8082"), "8082");
    }

    #[test]
    fn required_names_the_variable() {
        let vars = EnvMap::new();
        let err = EnvReader::new(&vars).required("REDIS_HOST").unwrap_err();
        assert!(err.to_string().contains("REDIS_HOST"));
    }

    #[test]
    fn parse_or_rejects_garbage() {
        let vars = env(&[("PORT", "eighty")]);
        let reader = EnvReader::new(&vars);
        let err = reader.parse_or::<u16>("PORT", 8082, "a port number").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "PORT"));
        assert_eq!(reader.parse_or::<u32>("DATABASE_POOL", 5000, "an integer").unwrap(), 5000);
    }
}
