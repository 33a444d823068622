//! Redis counter store.
//!
//! Increment and expiry happen in one server-side script, so concurrent submissions from
//! the same client cannot interleave between the read and the write.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{Client, RedisResult, Script};
use tracing::{debug, info, warn};

use rsvp_core::{CounterStore, RsvpError};

/// `INCR`, then attach the TTL only when this call created the key.
const INCREMENT_SCRIPT: &str = r#"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
"#;

/// Counter store backed by Redis (or any protocol-compatible server).
pub struct RedisCounterStore {
    connection: ConnectionManager,
    increment: Script,
    timeout: Duration,
}

impl RedisCounterStore {
    /// Connect to `address` (`host:port` or a `redis://` URL) and verify with `PING`.
    ///
    /// `timeout` bounds the dial and every later command.
    pub async fn connect(address: &str, timeout: Duration) -> Result<Self, RsvpError> {
        let url = if address.starts_with("redis://") || address.starts_with("rediss://") {
            address.to_string()
        } else {
            format!("redis://{address}")
        };

        let client = Client::open(url.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to create Redis client");
            RsvpError::CounterStore(format!("invalid counter store address: {e}"))
        })?;

        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout);

        let connection = bounded(timeout, client.get_connection_manager_with_config(config))
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to connect to Redis");
                e
            })?;

        let store = Self {
            connection,
            increment: Script::new(INCREMENT_SCRIPT),
            timeout,
        };
        store.ping().await?;

        info!(address, "Connected to Redis counter store");
        Ok(store)
    }

    async fn ping(&self) -> Result<(), RsvpError> {
        let mut conn = self.connection.clone();
        let _pong: String = bounded(self.timeout, redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }
}

/// Run a Redis call under a deadline, folding both failure kinds into [`RsvpError`].
async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = RedisResult<T>>,
) -> Result<T, RsvpError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(RsvpError::CounterStore(e.to_string())),
        Err(_) => Err(RsvpError::CounterStore(format!(
            "counter store call exceeded {}ms",
            timeout.as_millis()
        ))),
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, RsvpError> {
        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs().max(1);

        let mut invocation = self.increment.key(key);
        invocation.arg(ttl_secs);
        let count: u64 = bounded(self.timeout, invocation.invoke_async(&mut conn)).await?;

        debug!(key, count, "Counter incremented");
        Ok(count)
    }
}
