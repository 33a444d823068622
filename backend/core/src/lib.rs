pub mod error;
pub mod traits;
pub mod types;

pub use error::RsvpError;
pub use traits::{CounterStore, RsvpRepository};
pub use types::{
    Attendance, File, NewRsvp, Parameter, Rsvp, RsvpResult, SortField, DEFAULT_LIMIT,
    DEFAULT_OFFSET, NO_LIMIT,
};
