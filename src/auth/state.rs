//! Auth state and configuration.

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::{fmt, str::FromStr, sync::Arc};

use super::{
    credentials::{CredentialVerifier, UserLookup},
    token::SessionCodec,
};

const DEFAULT_PROTECTED_PREFIX: &str = "/dashboard";
const DEFAULT_LOGIN_PATH: &str = "/login";

/// Deployment environment; only production marks cookies `Secure`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    environment: Environment,
    protected_prefix: String,
    login_path: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            protected_prefix: DEFAULT_PROTECTED_PREFIX.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn protected_prefix(&self) -> &str {
        &self.protected_prefix
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Shared, read-only state for the login route, the guard and the dashboard.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    codec: SessionCodec,
    verifier: CredentialVerifier,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, codec: SessionCodec, verifier: CredentialVerifier) -> Self {
        Self {
            config,
            codec,
            verifier,
        }
    }

    /// Build the state from the signing secret and a user lookup.
    ///
    /// # Errors
    /// Returns an error if the secret is empty or the verifier cannot be built.
    pub fn from_secret(
        config: AuthConfig,
        secret: &SecretString,
        users: Arc<dyn UserLookup>,
    ) -> Result<Self> {
        let codec = SessionCodec::new(secret).context("invalid session signing secret")?;
        let verifier = CredentialVerifier::new(users).context("failed to build verifier")?;
        Ok(Self::new(config, codec, verifier))
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    #[must_use]
    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }
}
