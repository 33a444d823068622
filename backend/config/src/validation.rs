//! Config validation: cross-field checks with user-friendly error messages.

use crate::defaults::MIN_ADMIN_PASSWORD_LEN;
use crate::schema::Config;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &Config) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_database(config, &mut report);
    validate_rate_limit(config, &mut report);
    validate_admin(config, &mut report);
    report
}

fn validate_server(config: &Config, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.warn("server.port", "Port 0 binds a random port");
    }
    if config.server.request_timeout_secs == 0 {
        report.error("server.request_timeout_secs", "Request timeout must be positive");
    }
}

fn validate_database(config: &Config, report: &mut ValidationReport) {
    if config.is_test() {
        return;
    }
    if config.database.pool == 0 {
        report.error("database.pool", "Pool size must be at least 1");
    }
    if config.database.host.contains('/') {
        report.error(
            "database.host",
            "Host must be `host` or `host:port`, not a connection URI",
        );
    }
}

fn validate_rate_limit(config: &Config, report: &mut ValidationReport) {
    let limits = &config.rate_limit;
    if limits.max_requests == 0 {
        report.error("rate_limit.max_requests", "Ceiling of 0 rejects every submission");
    }
    if limits.window_secs == 0 {
        report.error("rate_limit.window_secs", "Window must be at least one second");
    }
    if limits.key_prefix.is_empty() {
        report.warn(
            "rate_limit.key_prefix",
            "Empty prefix stores counters under bare client addresses",
        );
    }
}

fn validate_admin(config: &Config, report: &mut ValidationReport) {
    if config.admin.password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
        report.warn(
            "admin.password",
            format!("Admin password is shorter than {MIN_ADMIN_PASSWORD_LEN} characters"),
        );
    }
    if config.admin.username.contains(':') {
        report.error("admin.username", "Basic auth usernames cannot contain ':'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvMap;

    fn config(extra: &[(&str, &str)]) -> Config {
        let mut vars: EnvMap = [
            ("ENV", "test"),
            ("FWS_RSVP_USERNAME", "admin"),
            ("FWS_RSVP_PASSWORD", "long-enough-secret"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        Config::from_vars(&vars).unwrap()
    }

    #[test]
    fn default_test_config_is_valid() {
        let report = validate(&config(&[]));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn zero_ceiling_is_error() {
        let report = validate(&config(&[("RATE_LIMIT_MAX", "0")]));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "rate_limit.max_requests");
    }

    #[test]
    fn short_password_is_warning() {
        let report = validate(&config(&[("FWS_RSVP_PASSWORD", "abc")]));
        assert!(report.is_valid());
        assert_eq!(report.warnings[0].path, "admin.password");
    }

    #[test]
    fn prepare_fails_on_errors() {
        let result = crate::prepare(config(&[("RATE_LIMIT_WINDOW_SECS", "0")]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("rate_limit.window_secs"));
    }
}
