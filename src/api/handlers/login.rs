//! `POST /api/login`: check credentials and issue the session cookie.
//!
//! Flow Overview: validate the JSON shape, verify the credentials on the
//! blocking pool (Argon2 is CPU bound), sign `{sub, email}` and set the
//! `session` cookie. Unknown emails and wrong passwords share one 401 body.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use super::valid_email;
use crate::auth::{cookie::session_cookie, AuthState, SessionClaims};

pub const INVALID_PAYLOAD: &str = "Invalid payload";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn is_valid(&self) -> bool {
        valid_email(&self.email) && !self.password.is_empty()
    }
}

// Keep passwords out of logs and spans.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub ok: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// The body is read as JSON whatever the `Content-Type` says.
fn parse_login(body: &[u8]) -> Option<LoginRequest> {
    match serde_json::from_slice::<LoginRequest>(body) {
        Ok(request) if request.is_valid() => Some(request),
        Ok(request) => {
            warn!("Rejected login payload: {:?}", request);
            None
        }
        Err(err) => {
            warn!("Rejected login payload: {err}");
            None
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Session cookie issued", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Malformed or incomplete payload", body = ErrorResponse),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    body: Bytes,
) -> Response {
    let Some(request) = parse_login(&body) else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_PAYLOAD);
    };

    let state = auth_state.0.clone();
    let checked = tokio::task::spawn_blocking(move || {
        state
            .verifier()
            .verify(&request.email, &request.password)
    })
    .await;

    let user = match checked {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Login failed: invalid credentials");
            return error_response(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
        }
        Err(err) => {
            error!("Credential check did not complete: {err}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    let claims = SessionClaims {
        sub: user.id,
        email: user.email,
    };

    let token = match auth_state.codec().sign(&claims) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to sign session token: {err:#}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    let cookie = match session_cookie(
        &token,
        auth_state.codec().ttl_seconds(),
        auth_state.config().session_cookie_secure(),
    ) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR);
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    info!(sub = %claims.sub, "Session issued");

    (StatusCode::OK, headers, Json(LoginResponse { ok: true })).into_response()
}
