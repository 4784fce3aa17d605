use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by [`super::ApiClient`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timeout after {timeout_ms} ms")]
    Timeout { timeout_ms: u128 },
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        message: String,
        code: Option<String>,
    },
    #[error("Response error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP-style status: 408 for timeouts, 0 when no response was received.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Timeout { .. } => StatusCode::REQUEST_TIMEOUT.as_u16(),
            Self::Http { status, .. } => *status,
            Self::Config(_) | Self::Network(_) | Self::Parse(_) => 0,
        }
    }

    /// Machine-readable error code, when one is known.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Timeout { .. } => Some("TIMEOUT"),
            Self::Network(_) => Some("NETWORK_ERROR"),
            Self::Http { code, .. } => code.as_deref(),
            Self::Config(_) | Self::Parse(_) => None,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
