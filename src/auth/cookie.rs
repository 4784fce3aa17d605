//! Session cookie formatting and parsing.

use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};

pub const SESSION_COOKIE_NAME: &str = "session";

/// Build the `HttpOnly` cookie carrying a freshly signed session token.
///
/// # Errors
/// Returns an error if the token contains characters not allowed in a header.
pub fn session_cookie(
    token: &str,
    max_age_seconds: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a cookie that tells the browser to drop the session.
///
/// # Errors
/// Returns an error if the header value cannot be built.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the session token from the request's `Cookie` headers.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name.trim() == SESSION_COOKIE_NAME)
                .then(|| value.trim().to_string())
                .filter(|token| !token.is_empty())
        })
}
