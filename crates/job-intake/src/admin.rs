//! Token guard for the admin screens.
//!
//! The configured token is accepted either as `Authorization: Bearer <token>` or as the
//! password of HTTP Basic credentials, so the screens stay usable from a browser.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;

const REALM: &str = r#"Basic realm="job-intake admin""#;

#[derive(Clone, Default)]
pub struct AdminGuard {
    token: Option<Arc<str>>,
}

impl AdminGuard {
    /// A blank or missing token locks the admin screens entirely.
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: token
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    fn admits(&self, headers: &HeaderMap) -> bool {
        match (self.token.as_deref(), presented_token(headers)) {
            (Some(expected), Some(presented)) => {
                expected.as_bytes().ct_eq(presented.as_bytes()).into()
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGuard")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn require_admin(
    State(guard): State<AdminGuard>,
    request: Request,
    next: Next,
) -> Response {
    if !guard.is_enabled() {
        tracing::warn!(path = %request.uri().path(), "admin route requested but no admin token is configured");
        return (
            StatusCode::FORBIDDEN,
            Html("<p>You are not authorized to access this page.</p>"),
        )
            .into_response();
    }

    if guard.admits(request.headers()) {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "admin credentials missing or invalid");
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Html("<p>Access denied. You must log in to view this page.</p>"),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM));
    response
}

fn presented_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, credentials) = value.split_once(' ')?;
    let credentials = credentials.trim();

    if scheme.eq_ignore_ascii_case("bearer") {
        return Some(credentials.to_string());
    }
    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = STANDARD.decode(credentials).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (_, password) = decoded.split_once(':')?;
        return Some(password.to_string());
    }
    None
}
