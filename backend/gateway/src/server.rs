//! HTTP Delivery Layer
//!
//! Binds the routes to their handlers behind the auth gates, applies the request timeout,
//! CORS and the standard decorators, and runs the server until a shutdown signal.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use rsvp_usecase::RsvpUsecase;

use crate::auth::{with_auth, AdminCredentials, AuthGate, AuthLevel};
use crate::handlers;
use crate::middleware::{standard_decorators, with_timeout};
use crate::rate_limit::RateLimiter;

/// Dependencies shared by every handler, built once at startup.
pub struct AppState {
    pub usecase: Arc<RsvpUsecase>,
    pub rate_limiter: Arc<RateLimiter>,
    pub credentials: Arc<AdminCredentials>,
}

/// Build the routed application.
///
/// Layers from the outside in: logging, request context, CORS, timeout. Every response,
/// timeouts and preflights included, carries a request id and is logged once.
///
/// | Method | Path          | Gate      |
/// |--------|---------------|-----------|
/// | GET    | /healthz      | none      |
/// | POST   | /rsvps        | anonymous |
/// | GET    | /rsvps        | admin     |
/// | GET    | /files/rsvps  | admin     |
pub fn build_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    let anonymous = AuthGate::new(AuthLevel::Anonymous, state.credentials.clone());
    let admin = AuthGate::new(AuthLevel::Admin, state.credentials.clone());

    let rsvps = with_auth(post(handlers::create_rsvp), anonymous)
        .merge(with_auth(get(handlers::retrieve_all_rsvp), admin.clone()))
        .fallback(handlers::not_found);
    let files = with_auth(get(handlers::download_rsvp_csv), admin).fallback(handlers::not_found);

    let router = Router::new()
        .route("/healthz", get(handlers::healthz).fallback(handlers::not_found))
        .route("/rsvps", rsvps)
        .route("/files/rsvps", files)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(request_timeout, with_timeout))
        .layer(cors_layer());

    standard_decorators(router)
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::PUT,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(86400))
}

/// Serve until Ctrl-C or SIGTERM. Peer addresses are exposed to handlers for rate limiting.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, request_timeout: Duration) -> Result<()> {
    let app = build_router(state, request_timeout);

    info!(addr = %listener.local_addr()?, "RSVP API listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("RSVP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
