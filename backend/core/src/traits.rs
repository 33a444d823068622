use std::time::Duration;

use async_trait::async_trait;

use crate::error::RsvpError;
use crate::types::{NewRsvp, Parameter, Rsvp, RsvpResult};

/// Document-store access for submissions.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait RsvpRepository: Send + Sync {
    /// Assign a fresh identifier and creation timestamp, then insert.
    async fn create_rsvp(&self, new: NewRsvp) -> Result<Rsvp, RsvpError>;

    /// Query submissions ordered by `param`'s sort field, paged unless the limit is the
    /// no-limit sentinel. `total` counts the full matching set, not just the page.
    async fn get_rsvps(&self, param: &Parameter) -> Result<RsvpResult, RsvpError>;
}

/// Keyed counter with expiry, used for rate limiting.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment `key` and return the new value.
    ///
    /// When the increment creates the counter (new value is 1) it expires after `ttl`;
    /// later increments inside the window leave the expiry untouched.
    async fn increment(&self, key: &str, ttl: Duration) -> Result<u64, RsvpError>;
}
