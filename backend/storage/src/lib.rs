//! Storage backends for the RSVP service.
//!
//! - [`InMemoryRsvpStore`] / [`MongoRsvpStore`] implement [`rsvp_core::RsvpRepository`]
//! - [`InMemoryCounterStore`] / [`RedisCounterStore`] implement [`rsvp_core::CounterStore`]
//!
//! The in-memory variants back the `test` environment and the test suites.

pub mod counter;
pub mod memory;
pub mod mongo;
pub mod redis_counter;

pub use counter::InMemoryCounterStore;
pub use memory::InMemoryRsvpStore;
pub use mongo::{MongoRsvpStore, MongoSettings};
pub use redis_counter::RedisCounterStore;
