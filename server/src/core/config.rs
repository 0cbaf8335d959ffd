use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    ANALYTICS_DATA_BASE_URL, APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_GOOGLE_TIMEOUT_SECS,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_POST_LOGIN_REDIRECT, ENV_POSTGRES_URL,
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
    SEARCH_CONSOLE_BASE_URL,
};

// =============================================================================
// Transactional Backend Enum
// =============================================================================

/// Database backend for the site registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionalBackend {
    #[default]
    Sqlite,
    Postgres,
}

impl fmt::Display for TransactionalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    pub post_login_redirect: Option<String>,
}

/// Google OAuth and reporting API section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GoogleFileConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_url: Option<String>,
    pub search_console_base_url: Option<String>,
    pub analytics_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use SITEPULSE_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 20)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 2)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 60)
    pub statement_timeout_secs: Option<u64>,
}

/// Database configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// Transactional backend: sqlite (default) or postgres
    pub transactional: Option<TransactionalBackend>,
    /// PostgreSQL-specific configuration
    pub postgres: Option<PostgresFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub google: Option<GoogleFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        // Server
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        // Auth
        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.enabled.is_some() {
                tracing::trace!(enabled = ?auth.enabled, "Merging auth.enabled");
                current.enabled = auth.enabled;
            }
            if auth.post_login_redirect.is_some() {
                tracing::trace!(redirect = ?auth.post_login_redirect, "Merging auth.post_login_redirect");
                current.post_login_redirect = auth.post_login_redirect;
            }
        }

        // Google
        if let Some(google) = other.google {
            let current = self.google.get_or_insert_with(GoogleFileConfig::default);
            if google.client_id.is_some() {
                tracing::trace!(client_id = ?google.client_id, "Merging google.client_id");
                current.client_id = google.client_id;
            }
            if google.client_secret.is_some() {
                tracing::trace!(client_secret = "***", "Merging google.client_secret");
                current.client_secret = google.client_secret;
            }
            if google.redirect_url.is_some() {
                tracing::trace!(redirect_url = ?google.redirect_url, "Merging google.redirect_url");
                current.redirect_url = google.redirect_url;
            }
            if google.search_console_base_url.is_some() {
                current.search_console_base_url = google.search_console_base_url;
            }
            if google.analytics_base_url.is_some() {
                current.analytics_base_url = google.analytics_base_url;
            }
            if google.request_timeout_secs.is_some() {
                tracing::trace!(timeout = ?google.request_timeout_secs, "Merging google.request_timeout_secs");
                current.request_timeout_secs = google.request_timeout_secs;
            }
        }

        // Database
        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.transactional.is_some() {
                tracing::trace!(transactional = ?database.transactional, "Merging database.transactional");
                current.transactional = database.transactional;
            }
            if let Some(postgres) = database.postgres {
                let current_pg = current
                    .postgres
                    .get_or_insert_with(PostgresFileConfig::default);
                if postgres.url.is_some() {
                    tracing::trace!(url = "***", "Merging database.postgres.url");
                    current_pg.url = postgres.url;
                }
                if postgres.max_connections.is_some() {
                    current_pg.max_connections = postgres.max_connections;
                }
                if postgres.min_connections.is_some() {
                    current_pg.min_connections = postgres.min_connections;
                }
                if postgres.acquire_timeout_secs.is_some() {
                    current_pg.acquire_timeout_secs = postgres.acquire_timeout_secs;
                }
                if postgres.idle_timeout_secs.is_some() {
                    current_pg.idle_timeout_secs = postgres.idle_timeout_secs;
                }
                if postgres.max_lifetime_secs.is_some() {
                    current_pg.max_lifetime_secs = postgres.max_lifetime_secs;
                }
                if postgres.statement_timeout_secs.is_some() {
                    current_pg.statement_timeout_secs = postgres.statement_timeout_secs;
                }
            }
        }

        // Debug
        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Browser redirect target after the OAuth callback succeeds
    pub post_login_redirect: String,
}

/// Google OAuth client and reporting API endpoints
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub search_console_base_url: String,
    pub analytics_base_url: String,
    pub request_timeout_secs: u64,
}

impl GoogleConfig {
    /// True when the OAuth client is fully configured
    pub fn has_oauth_client(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.redirect_url.is_empty()
    }
}

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = default)
    pub statement_timeout_secs: u64,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Transactional backend: sqlite (default) or postgres
    pub transactional: TransactionalBackend,
    /// PostgreSQL-specific configuration (only used if transactional = postgres)
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub google: GoogleConfig,
    pub database: DatabaseConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.sitepulse/sitepulse.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.sitepulse/sitepulse.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Extract file config values with defaults
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_google = file_config.google.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();

        // 4. Layer configs: defaults -> file config -> CLI/env overrides
        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(true)
        };

        let post_login_redirect = cli
            .post_login_redirect
            .clone()
            .or(file_auth.post_login_redirect)
            .unwrap_or_else(|| DEFAULT_POST_LOGIN_REDIRECT.to_string());

        let google = GoogleConfig {
            client_id: cli
                .google_client_id
                .clone()
                .or(file_google.client_id)
                .unwrap_or_default(),
            client_secret: cli
                .google_client_secret
                .clone()
                .or(file_google.client_secret)
                .unwrap_or_default(),
            redirect_url: cli
                .google_redirect_url
                .clone()
                .or(file_google.redirect_url)
                .unwrap_or_default(),
            search_console_base_url: file_google
                .search_console_base_url
                .unwrap_or_else(|| SEARCH_CONSOLE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            analytics_base_url: file_google
                .analytics_base_url
                .unwrap_or_else(|| ANALYTICS_DATA_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: file_google
                .request_timeout_secs
                .unwrap_or(DEFAULT_GOOGLE_TIMEOUT_SECS),
        };

        // database config: CLI/env overrides file config
        let transactional = cli
            .transactional_backend
            .or(file_database.transactional)
            .unwrap_or_default();

        let postgres = if transactional == TransactionalBackend::Postgres {
            let file_pg = file_database.postgres.unwrap_or_default();
            let url = cli
                .postgres_url
                .clone()
                .or_else(|| std::env::var(ENV_POSTGRES_URL).ok())
                .or(file_pg.url)
                .unwrap_or_default();
            Some(PostgresConfig {
                url,
                max_connections: file_pg
                    .max_connections
                    .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
                min_connections: file_pg
                    .min_connections
                    .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
                acquire_timeout_secs: file_pg
                    .acquire_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
                idle_timeout_secs: file_pg
                    .idle_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
                max_lifetime_secs: file_pg
                    .max_lifetime_secs
                    .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
                statement_timeout_secs: file_pg
                    .statement_timeout_secs
                    .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
            })
        } else {
            None
        };

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                enabled: auth_enabled,
                post_login_redirect,
            },
            google,
            database: DatabaseConfig {
                transactional,
                postgres,
            },
            debug,
        };

        // Validate configuration
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            auth_enabled = config.auth.enabled,
            debug = config.debug,
            oauth_client = config.google.has_oauth_client(),
            google_timeout_secs = config.google.request_timeout_secs,
            transactional_backend = %config.database.transactional,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind to a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.google.request_timeout_secs == 0 {
            anyhow::bail!("Configuration error: google.request_timeout_secs must be greater than 0");
        }

        if self.auth.enabled && !self.google.has_oauth_client() {
            anyhow::bail!(
                "Configuration error: google.client_id, google.client_secret and google.redirect_url \
                 are required when auth is enabled. Use --no-auth for local development."
            );
        }

        if self.database.transactional == TransactionalBackend::Postgres
            && self
                .database
                .postgres
                .as_ref()
                .is_none_or(|pg| pg.url.is_empty())
        {
            anyhow::bail!(
                "Configuration error: database.postgres.url is required when database.transactional is 'postgres'. \
                 Set via {} env var or database.postgres.url in config file.",
                ENV_POSTGRES_URL
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.sitepulse/sitepulse.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_auth_cli() -> CliConfig {
        CliConfig {
            no_auth: true,
            ..Default::default()
        }
    }

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_transactional_backend_serde() {
        let backend: TransactionalBackend = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(backend, TransactionalBackend::Postgres);
        assert_eq!(TransactionalBackend::default().to_string(), "sqlite");
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "auth": { "enabled": false, "post_login_redirect": "/dashboard" },
            "google": { "client_id": "cid", "request_timeout_secs": 5 },
            "database": { "transactional": "postgres", "postgres": { "max_connections": 4 } }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));
        let auth = config.auth.as_ref().unwrap();
        assert_eq!(auth.enabled, Some(false));
        assert_eq!(auth.post_login_redirect.as_deref(), Some("/dashboard"));
        let google = config.google.as_ref().unwrap();
        assert_eq!(google.client_id.as_deref(), Some("cid"));
        assert_eq!(google.request_timeout_secs, Some(5));
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.transactional, Some(TransactionalBackend::Postgres));
        assert_eq!(
            database.postgres.as_ref().unwrap().max_connections,
            Some(4)
        );
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            server: Some(ServerFileConfig {
                host: Some("base.host".to_string()),
                port: Some(1000),
            }),
            google: Some(GoogleFileConfig {
                client_id: Some("base-id".to_string()),
                client_secret: Some("base-secret".to_string()),
                ..Default::default()
            }),
            debug: Some(false),
            ..Default::default()
        };

        let overlay = FileConfig {
            server: Some(ServerFileConfig {
                host: None,
                port: Some(2000),
            }),
            google: Some(GoogleFileConfig {
                client_id: Some("overlay-id".to_string()),
                ..Default::default()
            }),
            debug: Some(true),
            ..Default::default()
        };

        base.merge(overlay);

        let server = base.server.unwrap();
        assert_eq!(server.host, Some("base.host".to_string()));
        assert_eq!(server.port, Some(2000));
        let google = base.google.unwrap();
        assert_eq!(google.client_id.as_deref(), Some("overlay-id"));
        assert_eq!(google.client_secret.as_deref(), Some("base-secret"));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::load(&no_auth_cli()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(!config.auth.enabled);
        assert_eq!(config.auth.post_login_redirect, DEFAULT_POST_LOGIN_REDIRECT);
        assert_eq!(config.google.search_console_base_url, SEARCH_CONSOLE_BASE_URL);
        assert_eq!(config.google.analytics_base_url, ANALYTICS_DATA_BASE_URL);
        assert_eq!(config.database.transactional, TransactionalBackend::Sqlite);
        assert!(config.database.postgres.is_none());
    }

    #[test]
    fn test_app_config_cli_override() {
        let temp_file = write_config(r#"{ "server": { "host": "file.host", "port": 7000 } }"#);
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            config: Some(temp_file.path().to_path_buf()),
            ..no_auth_cli()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 7000);
    }

    #[test]
    fn test_app_config_auth_requires_oauth_client() {
        let cli = CliConfig::default();
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("google.client_id"));
    }

    #[test]
    fn test_app_config_auth_with_oauth_client() {
        let cli = CliConfig {
            google_client_id: Some("id".to_string()),
            google_client_secret: Some("secret".to_string()),
            google_redirect_url: Some("http://localhost/cb".to_string()),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert!(config.auth.enabled);
        assert!(config.google.has_oauth_client());
    }

    #[test]
    fn test_app_config_base_urls_trimmed() {
        let temp_file = write_config(
            r#"{ "google": { "search_console_base_url": "http://127.0.0.1:9/gsc/" } }"#,
        );
        let cli = CliConfig {
            config: Some(temp_file.path().to_path_buf()),
            ..no_auth_cli()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.google.search_console_base_url, "http://127.0.0.1:9/gsc");
    }

    #[test]
    fn test_app_config_validation_server_port_zero() {
        let cli = CliConfig {
            port: Some(0),
            ..no_auth_cli()
        };
        let result = AppConfig::load(&cli);
        assert!(result.unwrap_err().to_string().contains("server.port"));
    }

    #[test]
    fn test_app_config_validation_empty_host() {
        let cli = CliConfig {
            host: Some(String::new()),
            ..no_auth_cli()
        };
        let result = AppConfig::load(&cli);
        assert!(result.unwrap_err().to_string().contains("server.host"));
    }

    #[test]
    fn test_app_config_postgres_url_from_cli() {
        let cli = CliConfig {
            transactional_backend: Some(TransactionalBackend::Postgres),
            postgres_url: Some("postgres://localhost/sitepulse".to_string()),
            ..no_auth_cli()
        };
        let config = AppConfig::load(&cli).unwrap();
        let pg = config.database.postgres.unwrap();
        assert_eq!(pg.url, "postgres://localhost/sitepulse");
        assert_eq!(pg.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_app_config_missing_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/sitepulse.json")),
            ..no_auth_cli()
        };
        let err = AppConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
