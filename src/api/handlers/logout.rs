use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use tracing::error;

use crate::auth::{cookie::clear_session_cookie, AuthState};

#[utoipa::path(
    post,
    path = "/api/logout",
    responses (
        (status = 303, description = "Session cookie cleared, redirect to the login page"),
    ),
    tag = "auth"
)]
// Tokens are not revoked; the browser just drops its copy.
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config().session_cookie_secure()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }

    (headers, Redirect::to(auth_state.config().login_path()))
}
