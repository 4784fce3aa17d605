use axum::response::Html;

const LOGIN_PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/login.html"));

/// Static sign-in form; it posts JSON to `/api/login` and follows `next`.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}
