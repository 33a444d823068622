//! Auth Gate
//!
//! Routes are wrapped with a gate at a fixed level. `Admin` gates require HTTP Basic
//! credentials matching the configured pair and reject everything else with 403 before
//! the handler runs. `Anonymous` gates admit every request.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

use rsvp_core::RsvpError;

use crate::response::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLevel {
    Anonymous,
    Admin,
}

/// The single administrator identity.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    level: AuthLevel,
    credentials: Arc<AdminCredentials>,
}

impl AuthGate {
    pub fn new(level: AuthLevel, credentials: Arc<AdminCredentials>) -> Self {
        Self { level, credentials }
    }

    pub fn level(&self) -> AuthLevel {
        self.level
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), RsvpError> {
        if self.level == AuthLevel::Anonymous {
            return Ok(());
        }
        match basic_credentials(headers) {
            Some((user, pass)) if self.credentials.matches(&user, &pass) => Ok(()),
            Some((user, _)) => {
                warn!(username = %user, "Rejected admin request with wrong credentials");
                Err(RsvpError::Unauthorized)
            }
            None => {
                warn!("Rejected admin request without basic credentials");
                Err(RsvpError::Unauthorized)
            }
        }
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`. The scheme name is case-insensitive.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

async fn authorize(State(gate): State<AuthGate>, request: Request, next: Next) -> Response {
    match gate.check(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Wrap a method router with a gate. Only the wrapped methods are affected.
pub fn with_auth<S>(route: MethodRouter<S>, gate: AuthGate) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(gate, authorize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn creds() -> Arc<AdminCredentials> {
        Arc::new(AdminCredentials::new("admin", "s3cret-pass"))
    }

    fn basic(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let value = format!("Basic {}", STANDARD.encode(raw));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        headers
    }

    #[test]
    fn anonymous_gate_admits_everything() {
        let gate = AuthGate::new(AuthLevel::Anonymous, creds());
        assert!(gate.check(&HeaderMap::new()).is_ok());
    }

    #[test]
    fn admin_gate_requires_matching_credentials() {
        let gate = AuthGate::new(AuthLevel::Admin, creds());
        assert!(gate.check(&basic("admin:s3cret-pass")).is_ok());
        assert!(matches!(
            gate.check(&basic("admin:wrong")),
            Err(RsvpError::Unauthorized)
        ));
        assert!(matches!(
            gate.check(&HeaderMap::new()),
            Err(RsvpError::Unauthorized)
        ));
    }

    #[test]
    fn decodes_basic_header() {
        assert_eq!(
            basic_credentials(&basic("user:pa:ss")),
            Some(("user".to_string(), "pa:ss".to_string()))
        );

        let mut headers = HeaderMap::new();
        let value = format!("basic {}", STANDARD.encode("a:b"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
        assert_eq!(basic_credentials(&headers), Some(("a".into(), "b".into())));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(basic_credentials(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert_eq!(basic_credentials(&headers), None);
    }

    #[test]
    fn debug_masks_password() {
        let rendered = format!("{:?}", creds());
        assert!(!rendered.contains("s3cret-pass"));
    }
}
