use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;
/// Offset used when the caller does not ask for one.
pub const DEFAULT_OFFSET: i64 = 0;
/// Limit sentinel that disables paging entirely.
pub const NO_LIMIT: i64 = -1;

/// A stored RSVP submission.
///
/// `id` and `created_at` are assigned by the repository on insert and never change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rsvp {
    pub id: String,
    pub name: String,
    pub address: String,
    pub attend: Attendance,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// The client-supplied part of a submission.
///
/// Every field defaults so that a missing key reaches the validator as an empty value
/// instead of failing body decoding. Unknown keys (including `id` / `created_at`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewRsvp {
    pub name: String,
    pub address: String,
    pub attend: Attendance,
    pub message: String,
}

impl NewRsvp {
    /// Stamp a submission with its store-assigned identity.
    pub fn into_rsvp(self, id: impl Into<String>, created_at: DateTime<Utc>) -> Rsvp {
        Rsvp {
            id: id.into(),
            name: self.name,
            address: self.address,
            attend: self.attend,
            message: self.message,
            created_at,
        }
    }
}

/// Attendance answer, stored and transmitted as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i16")]
pub enum Attendance {
    #[default]
    No = 0,
    Yes = 1,
    Maybe = 2,
}

impl Attendance {
    /// Human-readable label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            Attendance::No => "No",
            Attendance::Yes => "Yes",
            Attendance::Maybe => "Maybe",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Attendance> for i16 {
    fn from(value: Attendance) -> Self {
        value as i16
    }
}

impl TryFrom<i64> for Attendance {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Attendance::No),
            1 => Ok(Attendance::Yes),
            2 => Ok(Attendance::Maybe),
            other => Err(format!("unknown attendance value {other}")),
        }
    }
}

/// Whitelisted sort orders for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
    NameAsc,
    NameDesc,
}

impl SortField {
    /// Parse a sort expression (`name`, `-created_at`, ...). Case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "created_at" => Some(SortField::CreatedAtAsc),
            "-created_at" => Some(SortField::CreatedAtDesc),
            "name" => Some(SortField::NameAsc),
            "-name" => Some(SortField::NameDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAtAsc => "created_at",
            SortField::CreatedAtDesc => "-created_at",
            SortField::NameAsc => "name",
            SortField::NameDesc => "-name",
        }
    }

    /// Document field the order applies to.
    pub fn field(&self) -> &'static str {
        match self {
            SortField::CreatedAtAsc | SortField::CreatedAtDesc => "created_at",
            SortField::NameAsc | SortField::NameDesc => "name",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortField::CreatedAtDesc | SortField::NameDesc)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request query specification for listings and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub sort: String,
    pub limit: i64,
    pub offset: i64,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            sort: String::new(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Parameter {
    /// Build a parameter, replacing out-of-range paging values with defaults.
    ///
    /// `limit` must be positive or [`NO_LIMIT`]; `offset` is clamped at zero.
    pub fn new(sort: impl Into<String>, limit: i64, offset: i64) -> Self {
        let limit = if limit == NO_LIMIT || limit > 0 {
            limit
        } else {
            DEFAULT_LIMIT
        };
        Self {
            sort: sort.into(),
            limit,
            offset: offset.max(0),
        }
    }

    /// The sort order to apply, falling back to newest-first for anything off the whitelist.
    pub fn sort_field(&self) -> SortField {
        SortField::parse(&self.sort).unwrap_or_default()
    }

    /// `(skip, limit)` to apply, or `None` when paging is disabled.
    pub fn page(&self) -> Option<(u64, u64)> {
        if self.limit == NO_LIMIT {
            return None;
        }
        Some((self.offset.max(0) as u64, self.limit.max(0) as u64))
    }
}

/// A page of submissions plus the size of the full matching set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RsvpResult {
    pub data: Vec<Rsvp>,
    pub total: u64,
}

/// A generated export held in memory until it is written to the response.
#[derive(Debug, Clone)]
pub struct File {
    pub content: Vec<u8>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_labels() {
        assert_eq!(Attendance::No.to_string(), "No");
        assert_eq!(Attendance::Yes.to_string(), "Yes");
        assert_eq!(Attendance::Maybe.to_string(), "Maybe");
    }

    #[test]
    fn attendance_round_trips_as_integer() {
        let json = serde_json::to_string(&Attendance::Maybe).unwrap();
        assert_eq!(json, "2");
        let parsed: Attendance = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Attendance::Yes);
        assert!(serde_json::from_str::<Attendance>("-1").is_err());
        assert!(serde_json::from_str::<Attendance>("3").is_err());
    }

    #[test]
    fn new_rsvp_defaults_missing_fields() {
        let parsed: NewRsvp = serde_json::from_str(r#"{"name":"Ana","created_at":"x","id":"y"}"#).unwrap();
        assert_eq!(parsed.name, "Ana");
        assert_eq!(parsed.address, "");
        assert_eq!(parsed.attend, Attendance::No);
    }

    #[test]
    fn sort_field_whitelist() {
        assert_eq!(SortField::parse("name"), Some(SortField::NameAsc));
        assert_eq!(SortField::parse("-NAME"), Some(SortField::NameDesc));
        assert_eq!(SortField::parse("banana"), None);
        assert_eq!(Parameter::new("banana", 10, 0).sort_field(), SortField::CreatedAtDesc);
        assert_eq!(Parameter::default().sort_field().as_str(), "-created_at");
    }

    #[test]
    fn parameter_paging() {
        assert_eq!(Parameter::new("", 20, 40).page(), Some((40, 20)));
        assert_eq!(Parameter::new("", NO_LIMIT, 5).page(), None);
        assert_eq!(Parameter::new("", 0, -3), Parameter::new("", DEFAULT_LIMIT, 0));
        assert_eq!(Parameter::new("", -7, 0).limit, DEFAULT_LIMIT);
    }
}
