//! Route guard for the protected path prefix.
//!
//! Requests outside the prefix pass through untouched. Requests inside it need
//! a valid `session` cookie; otherwise they are redirected to the login page
//! with the original path in `next`. The guard never clears or refreshes the
//! cookie.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, info};
use url::form_urlencoded;

use super::{authorize, state::AuthState, Session};

/// `true` for the prefix itself and anything below it, e.g. `/dashboard` and
/// `/dashboard/settings` but not `/dashboards`.
#[must_use]
pub fn is_protected(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Build the `/login?next=<path>` location for a rejected request.
#[must_use]
pub fn login_location(login_path: &str, next: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{login_path}?{query}")
}

/// Redirect to the login page, preserving the requested path.
#[must_use]
pub fn login_redirect(login_path: &str, next: &str) -> Response {
    Redirect::temporary(&login_location(login_path, next)).into_response()
}

/// Middleware gating the protected prefix on a valid session cookie.
pub async fn require_session(
    Extension(auth_state): Extension<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !is_protected(&path, auth_state.config().protected_prefix()) {
        return next.run(request).await;
    }

    match authorize(request.headers(), auth_state.codec()) {
        Session::Authorized(claims) => {
            debug!(sub = %claims.sub, "Session accepted for {path}");
            next.run(request).await
        }
        Session::Unauthorized => {
            info!("Redirecting unauthenticated request for {path}");
            login_redirect(auth_state.config().login_path(), &path)
        }
    }
}
