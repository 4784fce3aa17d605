//! Session issuance and verification.
//!
//! Flow Overview: the login route checks credentials with
//! [`CredentialVerifier`], signs `{sub, email}` with [`SessionCodec`] and sets
//! the `session` cookie. The route guard and the dashboard page each call
//! [`authorize`] on their own; neither trusts that the other already ran.

pub mod cookie;
pub mod credentials;
pub mod guard;
pub mod state;
pub mod token;

use axum::http::HeaderMap;

pub use credentials::{CredentialVerifier, InMemoryUsers, UserLookup, UserRecord};
pub use guard::require_session;
pub use state::{AuthConfig, AuthState, Environment};
pub use token::{SessionClaims, SessionCodec};

/// Outcome of checking a request's session cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Authorized(SessionClaims),
    Unauthorized,
}

/// Verify the `session` cookie carried by `headers`.
#[must_use]
pub fn authorize(headers: &HeaderMap, codec: &SessionCodec) -> Session {
    cookie::extract_session_token(headers)
        .and_then(|token| codec.verify(&token))
        .map_or(Session::Unauthorized, Session::Authorized)
}
