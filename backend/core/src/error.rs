use thiserror::Error;

/// Top-level error type for the RSVP service.
///
/// Every variant maps to exactly one entry of the public error table (code + HTTP status);
/// see [`RsvpError::code`] and [`RsvpError::http_status`].
#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("Request Body or Parameter is not valid")]
    BadRequest { field: Option<String> },

    #[error("You can't access this page")]
    Unauthorized,

    #[error("Too many requests. Please try again later")]
    RateLimitExceeded,

    #[error("request exceeded its {0}ms budget")]
    RequestTimeout(u128),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("counter store error: {0}")]
    CounterStore(String),

    #[error("export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Message shown for every failure that is not classified.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error. Please try again in a few minutes";

impl RsvpError {
    /// Bad request without a specific field (malformed body, bad parameter).
    pub fn bad_request() -> Self {
        RsvpError::BadRequest { field: None }
    }

    /// Bad request pinned to a named field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        RsvpError::BadRequest {
            field: Some(field.into()),
        }
    }

    /// Application error code carried in the error envelope.
    pub fn code(&self) -> u32 {
        match self {
            RsvpError::Unauthorized => 9002,
            RsvpError::BadRequest { .. } => 9003,
            RsvpError::RateLimitExceeded => 9004,
            _ => 9001,
        }
    }

    /// HTTP status the error is rendered with.
    pub fn http_status(&self) -> u16 {
        match self {
            RsvpError::Unauthorized => 403,
            RsvpError::BadRequest { .. } => 400,
            RsvpError::RateLimitExceeded => 429,
            RsvpError::RequestTimeout(_) => 408,
            _ => 500,
        }
    }

    /// Whether this is an unclassified failure rendered as the generic 500.
    pub fn is_internal(&self) -> bool {
        self.http_status() == 500
    }

    /// Message safe to show to the caller. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        if self.is_internal() || matches!(self, RsvpError::RequestTimeout(_)) {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            RsvpError::BadRequest { field } => field.as_deref(),
            _ => None,
        }
    }
}
