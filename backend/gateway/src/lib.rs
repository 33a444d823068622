//! RSVP HTTP API
//!
//! Delivery layer over [`rsvp_usecase::RsvpUsecase`]: routing, auth gates, validation,
//! rate limiting and the JSON response envelopes.

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod rate_limit;
pub mod response;
pub mod server;
pub mod validator;

pub use auth::{AdminCredentials, AuthGate, AuthLevel};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use response::{ApiError, ErrorInfo, MetaInfo};
pub use server::{build_router, serve, AppState};
