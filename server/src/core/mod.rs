//! Core application infrastructure

pub(crate) mod banner;
pub mod cli;
pub mod config;
pub mod constants;
pub mod secret;
pub mod shutdown;
pub mod storage;

pub use crate::app::CoreApp;
pub use cli::{CliConfig, Commands};
pub use config::{AppConfig, AuthConfig, GoogleConfig, ServerConfig};
pub use secret::{SecretBackend, SecretManager};
pub use storage::{AppStorage, DataSubdir};

pub use crate::data::TransactionalService;
pub use crate::data::{PostgresService, SqliteService};

pub use shutdown::ShutdownService;
