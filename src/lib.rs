//! # Gatehouse (session authentication and route protection)
//!
//! `gatehouse` issues signed session cookies on a successful credential check
//! and gates every request under `/dashboard` on a valid session.
//!
//! ## Session lifecycle
//!
//! - **Issue:** `POST /api/login` checks the submitted email/password against
//!   an Argon2id hash and answers with an `HttpOnly` `session` cookie holding
//!   an HS256 token that expires after one hour.
//! - **Verify:** the route guard and the dashboard page each verify the
//!   cookie on their own. Forged, expired and malformed tokens are all just
//!   "invalid" and end in a redirect to `/login?next=<path>`, never in an
//!   HTTP error.
//! - **Expire:** tokens are never revoked server-side. Logging out clears the
//!   cookie only.
//!
//! ## Outbound API client
//!
//! [`client::ApiClient`] talks to an external authentication API with an
//! explicit base URL and a per-request timeout. It backs the `login`
//! subcommand.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
