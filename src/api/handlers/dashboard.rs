//! `GET /dashboard`: the protected page.
//!
//! The page re-verifies the session cookie itself instead of relying on the
//! route guard having run, and redirects to the login page when the check
//! fails.

use axum::{
    extract::Extension,
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{authorize, guard::login_redirect, AuthState, Session, SessionClaims};

#[utoipa::path(
    get,
    path = "/dashboard",
    responses (
        (status = 200, description = "Dashboard for the signed-in user", content_type = "text/html"),
        (status = 307, description = "No valid session, redirect to /login?next=/dashboard"),
    ),
    tag = "pages"
)]
pub async fn dashboard(
    auth_state: Extension<Arc<AuthState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match authorize(&headers, auth_state.codec()) {
        Session::Authorized(claims) => Html(render(&claims)).into_response(),
        Session::Unauthorized => {
            warn!("Dashboard reached without a valid session");
            login_redirect(auth_state.config().login_path(), uri.path())
        }
    }
}

fn render(claims: &SessionClaims) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Dashboard</title></head>
<body>
<main>
<h1>Dashboard</h1>
<p>Signed in as <b>{email}</b></p>
<form action="/api/logout" method="POST"><button>Log out</button></form>
</main>
</body>
</html>
"#,
        email = escape_html(&claims.email)
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
