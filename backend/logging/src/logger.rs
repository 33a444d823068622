//! Structured Logger
//!
//! Wraps `tracing` to provide pretty or JSON console output, optional daily-rotated
//! NDJSON files, and `RUST_LOG`-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix for rotated log files (`rsvp.log.YYYY-MM-DD`).
const LOG_FILE_PREFIX: &str = "rsvp.log";

/// Initialize the global structured logger.
///
/// `level` is an env-filter directive used when `RUST_LOG` is unset. With `json` the console
/// emits one JSON object per event. When `log_dir` is given, events are also appended as
/// NDJSON to a daily-rotated file there. Calling this twice is a no-op.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json_console = json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let pretty_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
    });

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(pretty_console)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_logger("debug", true, None);
        init_logger("info", false, None);
        tracing::info!("logger initialized twice without panicking");
    }
}
