//! Rate Limiter
//!
//! Fixed-window counting per client IP on top of a [`CounterStore`]. Every attempt
//! increments the counter, rejected ones included, and the window starts at the first
//! request. A failing counter store rejects the request as an internal error.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use rsvp_core::{CounterStore, RsvpError};

#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub max_requests: u64,
    pub window: Duration,
    pub key_prefix: String,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(3600),
            key_prefix: "rsvp:ratelimit:".to_string(),
        }
    }
}

pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub fn key_for(&self, client: &str) -> String {
        format!("{}{}", self.policy.key_prefix, client)
    }

    /// Count one attempt for `client`. Returns the attempts left in the current window.
    pub async fn check(&self, client: &str) -> Result<u64, RsvpError> {
        let key = self.key_for(client);
        let count = self
            .store
            .increment(&key, self.policy.window)
            .await
            .inspect_err(|e| error!(key = %key, error = %e, "Rate limit counter unavailable"))?;

        if count > self.policy.max_requests {
            warn!(client = %client, count, max = self.policy.max_requests, "Rate limit exceeded");
            return Err(RsvpError::RateLimitExceeded);
        }
        debug!(client = %client, count, max = self.policy.max_requests, "Rate limit OK");
        Ok(self.policy.max_requests - count)
    }
}

/// Client identity used for limiting: the peer IP without its port.
pub fn client_key(peer: &SocketAddr) -> String {
    client_ip(peer).to_string()
}

fn client_ip(peer: &SocketAddr) -> IpAddr {
    match peer.ip() {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}
