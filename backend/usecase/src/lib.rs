//! Submission use-cases sitting between the HTTP layer and the repository.

pub mod export;
pub mod rsvp;

pub use export::{export_filename, write_csv, CSV_HEADER};
pub use rsvp::{valid_sort_field, RsvpUsecase};
