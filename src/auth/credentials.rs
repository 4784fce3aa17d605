//! Credential checks against Argon2id password hashes.
//!
//! Unknown emails and wrong passwords both come back as `None`. When the email
//! is unknown the verifier still runs one hash verification against a dummy
//! hash so both paths cost about the same.

use anyhow::{anyhow, Result};
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::{collections::HashMap, sync::Arc};

pub const DEMO_USER_ID: &str = "u_1";
pub const DEMO_USER_EMAIL: &str = "demo@company.com";
pub const DEMO_USER_PASSWORD: &str = "secret123";

/// Stored user; `password_hash` is a PHC-encoded Argon2id hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Lookup of user records by email.
pub trait UserLookup: Send + Sync {
    /// Exact, case-sensitive email match.
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;
}

/// In-memory users keyed by email.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUsers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user, hashing the plaintext password.
    ///
    /// # Errors
    /// Returns an error if the password cannot be hashed.
    pub fn with_user(mut self, id: &str, email: &str, password: &str) -> Result<Self> {
        let record = UserRecord {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        self.users.insert(record.email.clone(), record);
        Ok(self)
    }

    /// The single demo account (`demo@company.com` / `secret123`).
    ///
    /// # Errors
    /// Returns an error if the password cannot be hashed.
    pub fn demo() -> Result<Self> {
        Self::new().with_user(DEMO_USER_ID, DEMO_USER_EMAIL, DEMO_USER_PASSWORD)
    }
}

impl UserLookup for InMemoryUsers {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.get(email).cloned()
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| anyhow!("failed to hash password"))?
        .to_string();
    Ok(hash)
}

fn password_matches(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Checks submitted credentials against a [`UserLookup`].
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserLookup>,
    dummy_hash: String,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    /// # Errors
    /// Returns an error if the dummy hash cannot be computed.
    pub fn new(users: Arc<dyn UserLookup>) -> Result<Self> {
        Ok(Self {
            users,
            dummy_hash: hash_password("gatehouse-dummy-password")?,
        })
    }

    /// Return the matching user, or `None` for an unknown email or a wrong password.
    #[must_use]
    pub fn verify(&self, email: &str, password: &str) -> Option<UserRecord> {
        if let Some(user) = self.users.find_by_email(email) {
            password_matches(password, &user.password_hash).then_some(user)
        } else {
            let _ = password_matches(password, &self.dummy_hash);
            None
        }
    }
}
