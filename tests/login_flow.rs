//! End-to-end tests for the login flow against the assembled router.
//!
//! Each test drives `gatehouse::api::app` in process with `tower::ServiceExt`:
//! sign in through `POST /api/login`, replay the issued cookie against the
//! guarded `/dashboard` tree, and check the redirects taken without one.

#![allow(clippy::unwrap_used)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use gatehouse::{
    api,
    auth::{AuthConfig, AuthState, Environment, InMemoryUsers},
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn state(environment: Environment) -> Arc<AuthState> {
    static DEVELOPMENT: OnceLock<Arc<AuthState>> = OnceLock::new();
    static PRODUCTION: OnceLock<Arc<AuthState>> = OnceLock::new();

    let cell = match environment {
        Environment::Development => &DEVELOPMENT,
        Environment::Production => &PRODUCTION,
    };
    cell.get_or_init(|| {
        let users = InMemoryUsers::demo().unwrap();
        Arc::new(
            AuthState::from_secret(
                AuthConfig::new(environment),
                &SecretString::from(SECRET),
                Arc::new(users),
            )
            .unwrap(),
        )
    })
    .clone()
}

fn app() -> Router {
    api::app(state(Environment::Development))
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn login_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn location(response: &Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

/// The `session=<token>` pair from a `Set-Cookie` value.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_string()
}

async fn sign_in(app: Router) -> String {
    let response = send(
        app,
        login_request(&json!({"email": "demo@company.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&set_cookie(&response))
}

#[tokio::test]
async fn login_issues_cookie_that_opens_dashboard() {
    let app = app();

    let response = send(
        app.clone(),
        login_request(&json!({"email": "demo@company.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(!cookie.contains("Secure"));
    assert_eq!(json_body(response).await, json!({"ok": true}));

    let response = send(app, get("/dashboard", Some(&cookie_pair(&cookie)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response)
        .await
        .contains("Signed in as <b>demo@company.com</b>"));
}

#[tokio::test]
async fn dashboard_without_cookie_redirects_to_login() {
    let response = send(app(), get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?next=%2Fdashboard");
}

#[tokio::test]
async fn nested_protected_path_keeps_next() {
    let response = send(app(), get("/dashboard/reports/1", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?next=%2Fdashboard%2Freports%2F1");
}

#[tokio::test]
async fn tampered_cookie_redirects_to_login() {
    let app = app();
    let cookie = sign_in(app.clone()).await;

    // Flip a character inside the signature segment.
    let mut chars: Vec<char> = cookie.chars().collect();
    let index = chars.len() - 10;
    chars[index] = if chars[index] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let response = send(app.clone(), get("/dashboard", Some(&tampered))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login?next=%2Fdashboard");

    let response = send(app, get("/dashboard", Some("session=not-a-token"))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn token_from_other_secret_is_rejected() {
    let users = InMemoryUsers::demo().unwrap();
    let other = Arc::new(
        AuthState::from_secret(
            AuthConfig::new(Environment::Development),
            &SecretString::from("some-other-secret"),
            Arc::new(users),
        )
        .unwrap(),
    );
    let cookie = sign_in(api::app(other)).await;

    let response = send(app(), get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn unknown_protected_path_is_404_once_signed_in() {
    let app = app();
    let cookie = sign_in(app.clone()).await;

    let response = send(app, get("/dashboard/missing", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_paths_pass_through() {
    let app = app();

    let response = send(app.clone(), get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("<form"));

    let response = send(app.clone(), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "gatehouse");

    let response = send(app, get("/dashboards", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_password_is_401() {
    let response = send(
        app(),
        login_request(&json!({"email": "demo@company.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(
        json_body(response).await,
        json!({"error": "Invalid credentials"})
    );
}

#[tokio::test]
async fn unknown_email_is_401() {
    let response = send(
        app(),
        login_request(&json!({"email": "nobody@company.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Invalid credentials"})
    );
}

#[tokio::test]
async fn malformed_payloads_are_400() {
    let app = app();
    for body in [
        json!({"email": "not-an-email", "password": "secret123"}),
        json!({"email": "demo@company.com", "password": ""}),
        json!({"email": "demo@company.com"}),
        json!({"password": "secret123"}),
        json!([]),
    ] {
        let response = send(app.clone(), login_request(&body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(
            json_body(response).await,
            json!({"error": "Invalid payload"})
        );
    }

    let response = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn production_cookie_is_secure() {
    let app = api::app(state(Environment::Production));
    let response = send(
        app,
        login_request(&json!({"email": "demo@company.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).contains("; Secure"));
}

#[tokio::test]
async fn logout_clears_cookie_and_redirects() {
    let response = send(
        app(),
        Request::builder()
            .method("POST")
            .uri("/api/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = send(app(), get("/health", None)).await;
    let request_id = response.headers().get("x-request-id").unwrap();
    assert_eq!(request_id.len(), 26);
}

#[tokio::test]
async fn login_accepts_json_body_without_json_content_type() {
    let app = app();
    let body = json!({"email": "demo@company.com", "password": "secret123"}).to_string();

    let response = send(
        app.clone(),
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .body(Body::from(body.clone()))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).starts_with("session="));

    let response = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(Body::from(body))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
