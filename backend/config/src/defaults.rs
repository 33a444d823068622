//! Config defaults.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8082;

/// Inbound read/write budget for one request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 310;

pub const DEFAULT_DATABASE_HOST: &str = "localhost";
pub const DEFAULT_DATABASE_POOL: u32 = 5000;

/// Document-store dial timeout.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_MS: u64 = 2_000;

/// Per-command budget for counter-store calls.
pub const DEFAULT_REDIS_TIMEOUT_MS: u64 = 1_000;

pub const DEFAULT_RATE_LIMIT_MAX: u64 = 5;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 3600;
pub const DEFAULT_RATE_LIMIT_PREFIX: &str = "rsvp:ratelimit:";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment name that swaps real stores for in-memory ones.
pub const TEST_ENV: &str = "test";

/// Admin passwords shorter than this produce a warning.
pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;
