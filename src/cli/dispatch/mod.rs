use crate::{
    auth::Environment,
    cli::{
        actions::{login, server, Action},
        commands::{login as login_cmd, server as server_cmd},
    },
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((server_cmd::CMD_SERVER, sub_m)) => server_args(sub_m).map(Action::Server),
        Some((login_cmd::CMD_LOGIN, sub_m)) => login_args(sub_m).map(Action::Login),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn server_args(matches: &clap::ArgMatches) -> Result<server::Args> {
    let port = matches
        .get_one::<u16>(server_cmd::ARG_PORT)
        .copied()
        .unwrap_or(8080);
    let session_secret = matches
        .get_one::<String>(server_cmd::ARG_SESSION_SECRET)
        .map(|secret| SecretString::from(secret.clone()))
        .context("missing required argument: --session-secret")?;
    let environment = matches
        .get_one::<String>(server_cmd::ARG_ENVIRONMENT)
        .map(|value| value.parse::<Environment>())
        .transpose()?
        .unwrap_or_default();

    Ok(server::Args {
        port,
        session_secret,
        environment,
    })
}

fn login_args(matches: &clap::ArgMatches) -> Result<login::Args> {
    let string = |name: &str| -> Result<String> {
        matches
            .get_one::<String>(name)
            .cloned()
            .with_context(|| format!("missing required argument: --{name}"))
    };

    Ok(login::Args {
        api_base_url: string(login_cmd::ARG_API_BASE_URL)?,
        api_timeout_ms: matches
            .get_one::<u64>(login_cmd::ARG_API_TIMEOUT_MS)
            .copied()
            .unwrap_or(crate::client::DEFAULT_TIMEOUT_MS),
        login_endpoint: string(login_cmd::ARG_LOGIN_ENDPOINT)?,
        logout_endpoint: string(login_cmd::ARG_LOGOUT_ENDPOINT)?,
        username: string(login_cmd::ARG_USERNAME)?,
        password: SecretString::from(string(login_cmd::ARG_PASSWORD)?),
    })
}
