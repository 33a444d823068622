//! Response Formatter
//!
//! Every JSON response is an envelope: `{"data": ..., "meta": {...}}` on success and
//! `{"errors": [...], "meta": {...}}` on failure, with `meta.http_status` mirroring the
//! HTTP status line.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use rsvp_core::{Parameter, RsvpError};

/// Envelope metadata. Paging fields are present only on listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl MetaInfo {
    pub fn status(status: StatusCode) -> Self {
        Self {
            http_status: status.as_u16(),
            ..Self::default()
        }
    }

    /// Metadata for a listing page built from the (normalized) query parameter.
    pub fn listing(status: StatusCode, param: &Parameter, total: u64) -> Self {
        Self {
            http_status: status.as_u16(),
            offset: Some(param.offset),
            limit: Some(param.limit),
            total: Some(total),
            sort: Some(param.sort.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
    pub meta: MetaInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&RsvpError> for ErrorInfo {
    fn from(err: &RsvpError) -> Self {
        Self {
            message: err.public_message(),
            code: err.code(),
            field: err.field().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorInfo>,
    pub meta: MetaInfo,
}

impl ErrorResponse {
    /// Build the error envelope. The status comes from the first error; an empty list
    /// renders the generic internal error.
    pub fn build(errors: &[RsvpError]) -> (StatusCode, Self) {
        let (infos, status) = match errors.first() {
            Some(first) => (
                errors.iter().map(ErrorInfo::from).collect(),
                first.http_status(),
            ),
            None => {
                let fallback = RsvpError::Other(anyhow::anyhow!("unclassified failure"));
                (vec![ErrorInfo::from(&fallback)], fallback.http_status())
            }
        };
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Self {
                errors: infos,
                meta: MetaInfo::status(status),
            },
        )
    }
}

/// Internal detail attached to failed responses for the request logger.
#[derive(Debug, Clone)]
pub struct FailureReason(pub String);

/// One or more errors rendered through the single error-to-response mapping.
#[derive(Debug)]
pub struct ApiError(pub Vec<RsvpError>);

impl From<RsvpError> for ApiError {
    fn from(err: RsvpError) -> Self {
        ApiError(vec![err])
    }
}

impl From<Vec<RsvpError>> for ApiError {
    fn from(errors: Vec<RsvpError>) -> Self {
        ApiError(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        for err in self.0.iter().filter(|e| e.is_internal()) {
            error!(error = %err, "Request failed with internal error");
        }
        let reason = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let (status, body) = ErrorResponse::build(&self.0);
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(FailureReason(reason));
        response
    }
}

/// Render a success envelope with the given status.
pub fn success<T: Serialize>(status: StatusCode, data: T, meta: MetaInfo) -> Response {
    (status, Json(SuccessResponse { data, meta })).into_response()
}
