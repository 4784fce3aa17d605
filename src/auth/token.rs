//! Signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the subject id and email plus `iat`/`exp`.
//! Verification is all-or-nothing: a bad signature, a different key, an
//! elapsed expiry or a string that is not a token at all all come back as
//! `None`.

use anyhow::{anyhow, Context, Result};
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

/// Session lifetime in seconds.
pub const SESSION_TTL_SECONDS: u64 = 60 * 60;

/// Identity asserted by a session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    sub: String,
    email: String,
    iat: u64,
    exp: u64,
}

/// Signs and verifies session tokens with the process-wide secret.
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Build a codec from the signing secret.
    ///
    /// # Errors
    /// Returns an error if the secret is empty.
    pub fn new(secret: &SecretString) -> Result<Self> {
        let secret = secret.expose_secret().as_bytes();
        if secret.is_empty() {
            return Err(anyhow!("session signing secret must not be empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds: SESSION_TTL_SECONDS,
        })
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign claims into a token that expires `SESSION_TTL_SECONDS` from now.
    ///
    /// # Errors
    /// Returns an error if the token cannot be encoded.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String> {
        self.sign_at(claims, get_current_timestamp())
    }

    pub(crate) fn sign_at(&self, claims: &SessionClaims, issued_at: u64) -> Result<String> {
        let payload = TokenPayload {
            sub: claims.sub.clone(),
            email: claims.email.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .context("failed to sign session token")
    }

    /// Decode a token, returning its claims only if it is authentic and unexpired.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        match decode::<TokenPayload>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(SessionClaims {
                sub: data.claims.sub,
                email: data.claims.email,
            }),
            Err(err) => {
                debug!("Session token rejected: {:?}", err.kind());
                None
            }
        }
    }
}
