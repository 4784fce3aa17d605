use clap::{builder::PossibleValuesParser, Arg, Command};

pub const CMD_SERVER: &str = "server";
pub const ARG_PORT: &str = "port";
pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_ENVIRONMENT: &str = "environment";

#[must_use]
pub fn command() -> Command {
    Command::new(CMD_SERVER)
        .about("Serve the login API, the route guard and the dashboard")
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("GATEHOUSE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long("session-secret")
                .help("Secret used to sign and verify session tokens")
                .env("GATEHOUSE_SESSION_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long("environment")
                .help("Deployment environment; `production` marks the session cookie Secure")
                .env("GATEHOUSE_ENV")
                .default_value("development")
                .value_parser(PossibleValuesParser::new(["development", "production"])),
        )
}
