//! Structured logging for the RSVP service.
//!
//! Console output (pretty or JSON), optional rolling NDJSON files, env-based level control.

pub mod logger;

pub use logger::init_logger;
