use crate::{
    api,
    auth::{AuthConfig, AuthState, Environment, InMemoryUsers},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub session_secret: SecretString,
    pub environment: Environment,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the session secret is unusable, the demo user cannot be
/// hashed, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        environment = %args.environment,
        "Starting gatehouse"
    );

    let users = InMemoryUsers::demo().context("Failed to seed the user store")?;
    let auth_state = AuthState::from_secret(
        AuthConfig::new(args.environment),
        &args.session_secret,
        Arc::new(users),
    )
    .context("Failed to build auth state")?;

    api::new(args.port, Arc::new(auth_state)).await
}
