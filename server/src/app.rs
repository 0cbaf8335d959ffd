//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::secret::SecretManager;
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::TransactionalService;
use crate::domain::ReportFetcher;
use crate::domain::google::{GoogleClient, GoogleOAuth};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub secrets: SecretManager,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
    pub fetcher: ReportFetcher,
    /// None when the Google OAuth client is not configured
    pub oauth: Option<Arc<GoogleOAuth>>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::System {
                command: system_cmd,
            }) => {
                return Self::handle_system_command(system_cmd);
            }
            Some(Commands::Start) | None => {}
        }

        let app = Self::init(&cli_config).await?;
        Self::start_server(app).await
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;
        let secrets = SecretManager::init(&storage).await?;

        let database = Arc::new(
            TransactionalService::init(
                config.database.transactional,
                &storage,
                config.database.postgres.as_ref(),
            )
            .await
            .context("Failed to initialize database")?,
        );

        let auth = Arc::new(AuthManager::new(&secrets, config.auth.enabled));

        let client = GoogleClient::new(&config.google)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Google client: {}", e))?;
        let fetcher = ReportFetcher::new(Arc::new(client));

        // Config validation guarantees a client whenever auth is enabled
        let oauth = config
            .google
            .has_oauth_client()
            .then(|| GoogleOAuth::new(&config.google))
            .transpose()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Google OAuth: {}", e))?
            .map(Arc::new);

        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            secrets,
            database,
            auth,
            fetcher,
            oauth,
        })
    }

    fn handle_system_command(cmd: SystemCommands) -> Result<()> {
        match cmd {
            SystemCommands::Prune { yes } => Self::prune_data(yes),
        }
    }

    fn prune_data(skip_confirm: bool) -> Result<()> {
        let data_dir = AppStorage::resolve_data_dir();

        if !data_dir.exists() {
            println!(
                "Nothing to prune. Data directory does not exist: {}",
                data_dir.display()
            );
            return Ok(());
        }

        let data_dir = data_dir.canonicalize().unwrap_or(data_dir);

        println!("This will permanently delete the local site registry and signing key:");
        println!("  {}", data_dir.display());
        println!();
        println!("Stop the server first. Existing sessions stop working once the key is gone.");

        if !skip_confirm {
            print!("\nContinue? [y/N] ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;

            if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
                println!("Aborted.");
                return Ok(());
            }
        }

        std::fs::remove_dir_all(&data_dir)
            .with_context(|| format!("Failed to delete data directory: {}", data_dir.display()))?;
        println!("Pruned: {}", data_dir.display());
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Signal handlers go in before anything that can block
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(app.database.start_checkpoint_task(app.shutdown.subscribe()))
            .await;
        tracing::debug!(backend = %app.database.backend(), "Background tasks started");

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.auth.is_enabled(),
            app.oauth.is_some(),
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}
