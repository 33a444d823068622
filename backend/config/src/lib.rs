//! `rsvp-config` — RSVP service configuration.
//!
//! Provides:
//! - Typed config schema sourced from environment variables (optionally a `.env` file)
//! - Default values for everything that is not a credential
//! - Validation with fatal errors and logged warnings
//! - Redaction for safe startup logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{load_dotenv, process_env, ConfigError, EnvMap};
pub use redact::redact;
pub use schema::{
    AdminConfig, Config, DatabaseConfig, LoggingConfig, RateLimitConfig, RedisConfig,
    ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

/// Validate a freshly loaded config, logging warnings and failing on errors.
///
/// Call after the logger is initialized so the report is visible.
pub fn prepare(config: Config) -> Result<Config, ConfigError> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let summary = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::Validation(summary));
    }
    Ok(config)
}
