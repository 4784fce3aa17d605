use crate::client::{unix_now, ApiClient, LoginCredentials, StoredAuth};
use anyhow::{anyhow, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub api_base_url: String,
    pub api_timeout_ms: u64,
    pub login_endpoint: String,
    pub logout_endpoint: String,
    pub username: String,
    pub password: SecretString,
}

/// Log in against the external API and print the resulting session as JSON.
/// # Errors
/// Returns an error if the request fails or the API rejects the credentials.
pub async fn execute(args: Args) -> Result<()> {
    let client = ApiClient::new(
        &args.api_base_url,
        Duration::from_millis(args.api_timeout_ms),
    )?
    .with_endpoints(&args.login_endpoint, &args.logout_endpoint);

    debug!(base_url = client.base_url(), "Logging in");

    let credentials = LoginCredentials {
        username: args.username,
        password: args.password.expose_secret().to_string(),
    };

    let response = client
        .login(&credentials)
        .await
        .context("Login request failed")?;

    let message = response.message.clone();
    let auth = StoredAuth::from_response(response, unix_now())
        .ok_or_else(|| anyhow!("Login rejected: {message}"))?;

    info!(
        username = %auth.user.username,
        expires_at = auth.expires_at(),
        "Logged in"
    );

    let summary = json!({
        "username": auth.user.username,
        "fullname": auth.user.fullname,
        "role": auth.user.role_name,
        "token_type": auth.token_type,
        "expires_at": auth.expires_at(),
        "access_token": auth.access_token,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
