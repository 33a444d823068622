//! RSVP route handlers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use rsvp_core::{NewRsvp, RsvpError};

use crate::query::QueryHelper;
use crate::rate_limit::client_key;
use crate::response::{success, ApiError, MetaInfo};
use crate::server::AppState;
use crate::validator::validate;

/// `POST /rsvps`: decode, validate, rate-limit by peer address, then persist.
pub async fn create_rsvp(
    State(state): State<Arc<AppState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let submission: NewRsvp = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Rejected malformed RSVP body");
        RsvpError::bad_request()
    })?;

    let errors = validate(&submission);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let client = peer
        .map(|ConnectInfo(addr)| client_key(&addr))
        .unwrap_or_else(|| "unknown".to_string());
    state.rate_limiter.check(&client).await?;

    let created = state.usecase.create_rsvp(submission).await?;
    Ok(success(
        StatusCode::CREATED,
        created,
        MetaInfo::status(StatusCode::CREATED),
    ))
}

/// `GET /rsvps`: one page of submissions plus paging metadata.
pub async fn retrieve_all_rsvp(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let mut param = QueryHelper::new(query).parameter();
    let result = state.usecase.get_rsvps(&mut param).await?;
    let meta = MetaInfo::listing(StatusCode::OK, &param, result.total);
    Ok(success(StatusCode::OK, result.data, meta))
}

/// `GET /files/rsvps`: the selected page as a CSV attachment.
pub async fn download_rsvp_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let mut param = QueryHelper::new(query).parameter();
    let file = state.usecase.write_rsvps_csv(&mut param).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}

/// Liveness probe. Body and content type are what existing monitors expect.
pub async fn healthz() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "ok\n")
}

/// Envelope for unmatched paths and methods.
pub async fn not_found() -> Response {
    success(
        StatusCode::NOT_FOUND,
        "path not found",
        MetaInfo::status(StatusCode::NOT_FOUND),
    )
}
