use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::TransactionalBackend;
use super::constants::{
    ENV_CONFIG, ENV_DEBUG, ENV_GOOGLE_CLIENT_ID, ENV_GOOGLE_CLIENT_SECRET, ENV_GOOGLE_REDIRECT_URL,
    ENV_HOST, ENV_PORT, ENV_POST_LOGIN_REDIRECT, ENV_POSTGRES_URL, ENV_TRANSACTIONAL_BACKEND,
};

#[derive(Parser)]
#[command(name = "sitepulse")]
#[command(version, about = "Search Console and GA4 dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable authentication (for development)
    #[arg(long, global = true)]
    pub no_auth: bool,

    /// Enable debug mode (exposes the /debug diagnostics endpoint)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Google OAuth client id
    #[arg(long, global = true, env = ENV_GOOGLE_CLIENT_ID)]
    pub google_client_id: Option<String>,

    /// Google OAuth client secret
    #[arg(long, global = true, env = ENV_GOOGLE_CLIENT_SECRET, hide_env_values = true)]
    pub google_client_secret: Option<String>,

    /// Google OAuth redirect URL (must match the console registration)
    #[arg(long, global = true, env = ENV_GOOGLE_REDIRECT_URL)]
    pub google_redirect_url: Option<String>,

    /// Where to send the browser after a successful login
    #[arg(long, global = true, env = ENV_POST_LOGIN_REDIRECT)]
    pub post_login_redirect: Option<String>,

    // Database options
    /// Transactional database backend (sqlite or postgres)
    #[arg(long, global = true, env = ENV_TRANSACTIONAL_BACKEND, value_parser = parse_transactional_backend)]
    pub transactional_backend: Option<TransactionalBackend>,

    /// PostgreSQL connection URL (when using postgres backend)
    #[arg(long, global = true, env = ENV_POSTGRES_URL, hide_env_values = true)]
    pub postgres_url: Option<String>,
}

/// Parse transactional backend from CLI/env string
fn parse_transactional_backend(s: &str) -> Result<TransactionalBackend, String> {
    match s.to_lowercase().as_str() {
        "sqlite" => Ok(TransactionalBackend::Sqlite),
        "postgres" | "postgresql" => Ok(TransactionalBackend::Postgres),
        _ => Err(format!(
            "Invalid transactional backend '{}'. Valid options: sqlite, postgres",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete local data directory (database, signing key). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_url: Option<String>,
    pub post_login_redirect: Option<String>,
    pub transactional_backend: Option<TransactionalBackend>,
    pub postgres_url: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        debug: cli.debug,
        config: cli.config,
        google_client_id: cli.google_client_id,
        google_client_secret: cli.google_client_secret,
        google_redirect_url: cli.google_redirect_url,
        post_login_redirect: cli.post_login_redirect,
        transactional_backend: cli.transactional_backend,
        postgres_url: cli.postgres_url,
    };
    (config, cli.command)
}
