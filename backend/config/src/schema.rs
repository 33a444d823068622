//! Typed configuration schema.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::defaults::*;
use crate::env::{process_env, ConfigError, EnvMap, EnvReader};

/// RSVP service configuration. Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Environment name; `test` swaps real stores for in-memory ones.
    pub env: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub admin: AdminConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub pool: u32,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedisConfig {
    /// `host:port` of the counter store; `None` only in the test environment.
    pub address: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateLimitConfig {
    pub max_requests: u64,
    pub window_secs: u64,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&process_env())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: &EnvMap) -> Result<Self, ConfigError> {
        let env = EnvReader::new(vars);
        let env_name = env.get_or("ENV", "");
        let is_test = env_name == TEST_ENV;

        // Store coordinates are only mandatory when real stores are dialed.
        let store_var = |key: &str| -> Result<String, ConfigError> {
            if is_test {
                Ok(env.get_or(key, ""))
            } else {
                env.required(key)
            }
        };

        let server = ServerConfig {
            bind_address: env.get_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            port: env.parse_or("PORT", DEFAULT_PORT, "a port number")?,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let database = DatabaseConfig {
            host: env.get_or("DATABASE_HOST", DEFAULT_DATABASE_HOST),
            name: store_var("DATABASE_NAME")?,
            username: store_var("DATABASE_USERNAME")?,
            password: store_var("DATABASE_PASSWORD")?,
            pool: env.parse_or("DATABASE_POOL", DEFAULT_DATABASE_POOL, "a pool size")?,
            connect_timeout_ms: DEFAULT_DATABASE_CONNECT_TIMEOUT_MS,
        };

        let redis = RedisConfig {
            address: if is_test {
                env.get("REDIS_HOST")
            } else {
                Some(env.required("REDIS_HOST")?)
            },
            timeout_ms: DEFAULT_REDIS_TIMEOUT_MS,
        };

        let admin = AdminConfig {
            username: env.required("FWS_RSVP_USERNAME")?,
            password: env.required("FWS_RSVP_PASSWORD")?,
        };

        let rate_limit = RateLimitConfig {
            max_requests: env.parse_or("RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX, "an integer")?,
            window_secs: env.parse_or(
                "RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
                "a number of seconds",
            )?,
            key_prefix: env.get_or("RATE_LIMIT_PREFIX", DEFAULT_RATE_LIMIT_PREFIX),
        };

        let level = env
            .get("RUST_LOG")
            .or_else(|| env.get("LOG_LEVEL"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let json = match env.get("LOG_FORMAT").as_deref() {
            None | Some("pretty") | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT".to_string(),
                    value: other.to_string(),
                    expected: "`pretty` or `json`",
                })
            }
        };
        let logging = LoggingConfig {
            level,
            json,
            dir: env.get("LOG_DIR").map(PathBuf::from),
        };

        Ok(Self {
            env: env_name,
            server,
            database,
            redis,
            admin,
            rate_limit,
            logging,
        })
    }

    pub fn is_test(&self) -> bool {
        self.env == TEST_ENV
    }

    /// `host:port` the HTTP server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn production_vars() -> EnvMap {
        env(&[
            ("DATABASE_NAME", "rsvp"),
            ("DATABASE_USERNAME", "rsvp_app"),
            ("DATABASE_PASSWORD", "hunter22"),
            ("REDIS_HOST", "localhost:6379"),
            ("FWS_RSVP_USERNAME", "admin"),
            ("FWS_RSVP_PASSWORD", "correct-horse"),
        ])
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_vars(&production_vars()).unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.pool, 5000);
        assert_eq!(config.rate_limit.max_requests, DEFAULT_RATE_LIMIT_MAX);
        assert_eq!(config.redis.timeout(), Duration::from_secs(1));
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.server.request_timeout(), Duration::from_secs(310));
        assert!(!config.is_test());
        assert!(!config.logging.json);
    }

    #[test]
    fn missing_store_variable_is_named() {
        let mut vars = production_vars();
        vars.remove("REDIS_HOST");
        let err = Config::from_vars(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref v) if v == "REDIS_HOST"));
    }

    #[test]
    fn test_env_relaxes_store_variables() {
        let vars = env(&[
            ("ENV", "test"),
            ("FWS_RSVP_USERNAME", "admin"),
            ("FWS_RSVP_PASSWORD", "secret"),
        ]);
        let config = Config::from_vars(&vars).unwrap();
        assert!(config.is_test());
        assert_eq!(config.redis.address, None);
        assert_eq!(config.database.name, "");
    }

    #[test]
    fn admin_credentials_come_from_fws_variables() {
        let config = Config::from_vars(&production_vars()).unwrap();
        assert_eq!(config.admin.username, "admin");
        assert_eq!(config.admin.password, "correct-horse");
    }

    #[test]
    fn admin_credentials_always_required() {
        let vars = env(&[("ENV", "test"), ("FWS_RSVP_USERNAME", "admin")]);
        let err = Config::from_vars(&vars).unwrap_err();
        assert!(err.to_string().contains("FWS_RSVP_PASSWORD"));
    }

    #[test]
    fn reads_overrides() {
        let mut vars = production_vars();
        vars.insert("PORT".into(), "9000".into());
        vars.insert("RATE_LIMIT_MAX".into(), "3".into());
        vars.insert("LOG_FORMAT".into(), "json".into());
        let config = Config::from_vars(&vars).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
        assert_eq!(config.rate_limit.max_requests, 3);
        assert!(config.logging.json);
    }

    #[test]
    fn rejects_unknown_log_format() {
        let mut vars = production_vars();
        vars.insert("LOG_FORMAT".into(), "xml".into());
        assert!(Config::from_vars(&vars).is_err());
    }
}
