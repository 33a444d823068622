//! Field Validator
//!
//! Request types list their required fields explicitly; validation reports every missing
//! one instead of stopping at the first.

use rsvp_core::{NewRsvp, RsvpError};

/// A request body with required fields.
pub trait RequiredFields {
    /// `(field name, present)` for every required field.
    fn required_fields(&self) -> Vec<(&'static str, bool)>;
}

impl RequiredFields for NewRsvp {
    fn required_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("name", !self.name.is_empty()),
            ("address", !self.address.is_empty()),
        ]
    }
}

/// One `BadRequest` per missing required field; empty when the input is valid.
pub fn validate<T: RequiredFields>(input: &T) -> Vec<RsvpError> {
    input
        .required_fields()
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| RsvpError::missing_field(field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, address: &str) -> NewRsvp {
        NewRsvp {
            name: name.to_string(),
            address: address.to_string(),
            ..NewRsvp::default()
        }
    }

    #[test]
    fn complete_submission_has_no_errors() {
        assert!(validate(&submission("Ana", "Jl. Melati 3")).is_empty());
    }

    #[test]
    fn reports_each_missing_field() {
        let errors = validate(&submission("", ""));
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field()).collect();
        assert_eq!(fields, ["name", "address"]);

        let errors = validate(&submission("Ana", ""));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("address"));
    }

    #[test]
    fn optional_fields_are_never_checked() {
        let mut input = submission("Ana", "Jl. Melati 3");
        input.message = String::new();
        assert!(validate(&input).is_empty());
    }
}
