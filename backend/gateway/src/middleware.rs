//! Request decorators applied to every route.
//!
//! - [`with_request_context`] guarantees an `X-Request-ID` on the request and echoes it on
//!   the response.
//! - [`with_logging`] records method, path, status, request id and duration for each request.
//! - [`with_timeout`] bounds the inner handling time and answers with the error envelope.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use rsvp_core::RsvpError;

use crate::response::{ApiError, FailureReason};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

pub async fn with_request_context(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header_value = HeaderValue::from_str(&request_id)
        .unwrap_or_else(|_| HeaderValue::from_static("invalid"));
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, header_value.clone());
    request.extensions_mut().insert(RequestId(request_id));

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    response
}

pub async fn with_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;
    let request_id = response
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status();
    let reason = response
        .extensions()
        .get::<FailureReason>()
        .map(|r| r.0.as_str())
        .unwrap_or("");

    if status.is_server_error() {
        error!(request_id = %request_id, method = %method, path = %path, status = status.as_u16(), duration_ms, reason, "Request failed");
    } else if status.is_client_error() {
        warn!(request_id = %request_id, method = %method, path = %path, status = status.as_u16(), duration_ms, reason, "Request rejected");
    } else {
        info!(request_id = %request_id, method = %method, path = %path, status = status.as_u16(), duration_ms, "Request completed");
    }
    response
}

pub async fn with_timeout(State(budget): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(budget, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::from(RsvpError::RequestTimeout(budget.as_millis())).into_response(),
    }
}

/// Apply the standard decorators. Logging is outermost and reads the id the request
/// context echoed on the response.
pub fn standard_decorators(router: Router) -> Router {
    router
        .layer(middleware::from_fn(with_request_context))
        .layer(middleware::from_fn(with_logging))
}
