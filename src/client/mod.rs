//! HTTP client for the external authentication API.
//!
//! Every request goes to an explicit base URL with a fixed per-request
//! timeout. Non-2xx responses become [`ApiError::Http`] carrying the server's
//! `message` (or `error`) and `code` when the body is JSON, and a sanitized
//! text body otherwise. The client never stores tokens; see [`StoredAuth`].

mod error;
mod stored;
mod types;

pub use error::ApiError;
pub use stored::{unix_now, StoredAuth};
pub use types::{LoginCredentials, LoginData, LoginResponse, LogoutResponse, UserInfo};

use reqwest::{header, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::APP_USER_AGENT;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOGIN_ENDPOINT: &str = "/auth/login";
pub const DEFAULT_LOGOUT_ENDPOINT: &str = "/auth/logout";

const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    login_endpoint: String,
    logout_endpoint: String,
}

impl ApiClient {
    /// # Errors
    /// Returns [`ApiError::Config`] when the base URL is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = base_url.trim().trim_end_matches('/');
        let parsed = url::Url::parse(base)
            .map_err(|err| ApiError::Config(format!("Invalid API base URL '{base}': {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "Unsupported API base URL scheme: {}",
                parsed.scheme()
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base.to_string(),
            timeout,
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
            logout_endpoint: DEFAULT_LOGOUT_ENDPOINT.to_string(),
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, login: &str, logout: &str) -> Self {
        self.login_endpoint = login.to_string();
        self.logout_endpoint = logout.to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `POST {base}{login_endpoint}` with a JSON `{username, password}` body.
    ///
    /// # Errors
    /// See [`ApiError`].
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let url = self.url(&self.login_endpoint);
        self.send_json(self.http.post(url).json(credentials)).await
    }

    /// `POST {base}{logout_endpoint}` with an optional bearer authorization.
    ///
    /// # Errors
    /// See [`ApiError`].
    #[instrument(skip_all)]
    pub async fn logout(&self, auth: Option<&StoredAuth>) -> Result<LogoutResponse, ApiError> {
        let url = self.url(&self.logout_endpoint);
        let mut request = self.http.post(url);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth.auth_header());
        }
        self.send_json(request).await
    }

    fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|err| self.map_request_error(&err))?;
        debug!(status = %response.status(), "API response");
        handle_json_response(response).await
    }

    fn map_request_error(&self, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                timeout_ms: self.timeout.as_millis(),
            }
        } else {
            ApiError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Error envelope accepted from the server; either key may carry the message.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")));
    }

    let body = response.text().await.unwrap_or_default();
    let (message, code) = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => (
            parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| format!("HTTP Error: {}", status.as_u16())),
            parsed.code,
        ),
        Err(_) => (sanitize_body(&body, status.as_u16()), None),
    };

    Err(ApiError::Http {
        status: status.as_u16(),
        message,
        code,
    })
}

fn sanitize_body(body: &str, status: u16) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP Error: {status}")
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/v1")
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    fn login_body() -> Value {
        json!({
            "success": true,
            "code": "OK",
            "message": "Login successful",
            "data": {
                "access_token": "access",
                "refresh_token": "refresh",
                "token_type": "Bearer",
                "expires_in": 3600,
                "user": {
                    "id": 1,
                    "user_id": "usr_1",
                    "username": "alice",
                    "fullname": "Alice Example",
                    "email": "alice@example.com",
                    "phone_number": "",
                    "is_active": true,
                    "role_name": "admin",
                    "created_at": "2024-01-01T00:00:00Z"
                }
            }
        })
    }

    #[test]
    fn build_url_joins_slashes() {
        assert_eq!(
            build_url_with_base("http://h/api/v1/", "/auth/login"),
            "http://h/api/v1/auth/login"
        );
        assert_eq!(
            build_url_with_base("http://h/api/v1", "auth/login"),
            "http://h/api/v1/auth/login"
        );
        assert_eq!(build_url_with_base("", "/auth/login"), "/auth/login");
    }

    #[test]
    fn sanitize_body_truncates_and_defaults() {
        assert_eq!(sanitize_body("   ", 502), "HTTP Error: 502");
        assert_eq!(sanitize_body(&"x".repeat(500), 500).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn new_rejects_bad_base_urls() {
        let timeout = Duration::from_millis(DEFAULT_TIMEOUT_MS);
        assert!(matches!(
            ApiClient::new("not a url", timeout),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            ApiClient::new("ftp://example.com", timeout),
            Err(ApiError::Config(_))
        ));
        let client = ApiClient::new("http://localhost:8000/api/v1/", timeout).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.timeout(), timeout);
    }

    #[tokio::test]
    async fn login_posts_credentials_and_decodes_response() {
        let app = Router::new().route(
            "/api/v1/auth/login",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(body["username"], "alice");
                assert_eq!(body["password"], "secret");
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                assert!(agent.starts_with("gatehouse/"));
                Json(login_body())
            }),
        );
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let response = client.login(&credentials()).await.unwrap();
        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data.access_token, "access");
        assert_eq!(data.user.username, "alice");
    }

    #[tokio::test]
    async fn custom_endpoints_are_used() {
        let app = Router::new()
            .route("/api/v1/session/new", post(|| async { Json(login_body()) }))
            .route(
                "/api/v1/session/end",
                post(|headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({"success": auth == "Bearer access", "message": "bye"}))
                }),
            );
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_secs(5))
            .unwrap()
            .with_endpoints("/session/new", "/session/end");

        let response = client.login(&credentials()).await.unwrap();
        let auth = StoredAuth::from_data(response.data.unwrap(), 0);
        let logout = client.logout(Some(&auth)).await.unwrap();
        assert!(logout.success);
        assert_eq!(logout.message, "bye");
    }

    #[tokio::test]
    async fn http_error_uses_json_message_and_code() {
        let app = Router::new().route(
            "/api/v1/auth/login",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Invalid credentials", "code": "AUTH_FAILED"})),
                )
            }),
        );
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.login(&credentials()).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 401,
                message: "Invalid credentials".to_string(),
                code: Some("AUTH_FAILED".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn http_error_falls_back_to_error_key_and_text() {
        let app = Router::new()
            .route(
                "/api/v1/auth/login",
                post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "bad input"}))) }),
            )
            .route(
                "/api/v1/auth/logout",
                post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
            );
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.login(&credentials()).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert_eq!(err.to_string(), "Request failed (400): bad input");
        assert_eq!(err.code(), None);

        let err = client.logout(None).await.unwrap_err();
        assert_eq!(err.status(), 502);
        assert_eq!(err.to_string(), "Request failed (502): upstream down");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_parse_error() {
        let app = Router::new().route("/api/v1/auth/login", post(|| async { "not json" }));
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.login(&credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let app = Router::new().route(
            "/api/v1/auth/login",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(login_body())
            }),
        );
        let base = spawn(app).await;
        let client = ApiClient::new(&base, Duration::from_millis(100)).unwrap();

        let err = client.login(&credentials()).await.unwrap_err();
        assert_eq!(err, ApiError::Timeout { timeout_ms: 100 });
        assert_eq!(err.status(), 408);
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client =
            ApiClient::new(&format!("http://{addr}/api/v1"), Duration::from_secs(2)).unwrap();

        let err = client.login(&credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.code(), Some("NETWORK_ERROR"));
    }
}
