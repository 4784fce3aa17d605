use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_API_TIMEOUT_MS: &str = "api-timeout-ms";
pub const ARG_LOGIN_ENDPOINT: &str = "login-endpoint";
pub const ARG_LOGOUT_ENDPOINT: &str = "logout-endpoint";
pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn command() -> Command {
    let command = Command::new(CMD_LOGIN)
        .about("Log in against the external authentication API")
        .arg(
            Arg::new(ARG_USERNAME)
                .short('u')
                .long("username")
                .help("Account username")
                .env("GATEHOUSE_USERNAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long("password")
                .help("Account password")
                .env("GATEHOUSE_PASSWORD")
                .hide_env_values(true)
                .required(true),
        );

    with_api_args(command)
}

fn with_api_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("Base URL of the authentication API")
                .env("GATEHOUSE_API_BASE_URL")
                .default_value("http://localhost:8000/api/v1"),
        )
        .arg(
            Arg::new(ARG_API_TIMEOUT_MS)
                .long("api-timeout-ms")
                .help("Per-request timeout in milliseconds")
                .env("GATEHOUSE_API_TIMEOUT_MS")
                .default_value("10000")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOGIN_ENDPOINT)
                .long("login-endpoint")
                .help("Login endpoint path relative to the base URL")
                .env("GATEHOUSE_AUTH_LOGIN_ENDPOINT")
                .default_value("/auth/login"),
        )
        .arg(
            Arg::new(ARG_LOGOUT_ENDPOINT)
                .long("logout-endpoint")
                .help("Logout endpoint path relative to the base URL")
                .env("GATEHOUSE_AUTH_LOGOUT_ENDPOINT")
                .default_value("/auth/logout"),
        )
}
