use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::{LoginData, LoginResponse, UserInfo};

/// Tokens and profile kept after a successful API login.
///
/// Timestamps are Unix seconds. A stored login counts as authenticated only
/// while `stored_at + expires_in` is in the future.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct StoredAuth {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub stored_at: u64,
    pub user: UserInfo,
}

impl std::fmt::Debug for StoredAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAuth")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("stored_at", &self.stored_at)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl StoredAuth {
    #[must_use]
    pub fn from_data(data: LoginData, stored_at: u64) -> Self {
        Self {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            token_type: data.token_type,
            expires_in: data.expires_in,
            stored_at,
            user: data.user,
        }
    }

    /// `None` unless the response reports success and carries token data.
    #[must_use]
    pub fn from_response(response: LoginResponse, stored_at: u64) -> Option<Self> {
        if !response.success {
            return None;
        }
        response.data.map(|data| Self::from_data(data, stored_at))
    }

    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.stored_at.saturating_add(self.expires_in)
    }

    #[must_use]
    pub fn is_authenticated(&self, now: u64) -> bool {
        !self.access_token.is_empty() && now < self.expires_at()
    }

    /// Value for the `Authorization` header, e.g. `Bearer <token>`.
    #[must_use]
    pub fn auth_header(&self) -> String {
        let scheme = if self.token_type.trim().is_empty() {
            "Bearer"
        } else {
            self.token_type.trim()
        };
        format!("{scheme} {}", self.access_token)
    }
}

/// Current Unix time in seconds; a clock before the epoch reads as 0.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
