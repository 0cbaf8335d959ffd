// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "SitePulse";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "sitepulse";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".sitepulse";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "sitepulse.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SITEPULSE_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "SITEPULSE_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SITEPULSE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SITEPULSE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SITEPULSE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5410;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "SITEPULSE_DATA_DIR";

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the session signing secret
pub const ENV_AUTH_SECRET: &str = "SITEPULSE_AUTH_SECRET";

/// Environment variable for the redirect target after a successful login
pub const ENV_POST_LOGIN_REDIRECT: &str = "SITEPULSE_POST_LOGIN_REDIRECT";

/// File holding the generated signing key (inside the secrets subdir)
pub const SIGNING_KEY_FILENAME: &str = "signing.key";

/// Minimum accepted length of a configured signing secret, in bytes
pub const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Cookie name for session token
pub const SESSION_COOKIE_NAME: &str = "sitepulse_session";

/// Cookie name for the OAuth CSRF state
pub const OAUTH_STATE_COOKIE_NAME: &str = "sitepulse_oauth_state";

/// OAuth state cookie lifetime in seconds
pub const OAUTH_STATE_TTL_SECS: i64 = 600;

/// Default session TTL in days
pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// Default redirect after login
pub const DEFAULT_POST_LOGIN_REDIRECT: &str = "/";

/// User id used for every request when authentication is disabled
pub const LOCAL_USER_ID: &str = "local";

/// Auth method recorded in session claims
pub const AUTH_METHOD_GOOGLE: &str = "google";

// =============================================================================
// Google
// =============================================================================

/// Environment variable for the OAuth client id
pub const ENV_GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";

/// Environment variable for the OAuth client secret
pub const ENV_GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";

/// Environment variable for the OAuth redirect URL
pub const ENV_GOOGLE_REDIRECT_URL: &str = "GOOGLE_REDIRECT_URL";

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Default Search Console API base
pub const SEARCH_CONSOLE_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3";

/// Default GA4 Data API base
pub const ANALYTICS_DATA_BASE_URL: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Scopes requested at consent time
pub const GOOGLE_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/webmasters.readonly",
    "https://www.googleapis.com/auth/analytics.readonly",
];

/// Outbound request timeout for Google APIs
pub const DEFAULT_GOOGLE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Reports
// =============================================================================

/// Row limit for the daily search trend query
pub const TREND_ROW_LIMIT: u32 = 90;

/// Row limit for keyword/page/device breakdowns
pub const BREAKDOWN_ROW_LIMIT: u32 = 10;

/// Row limit for the GA4 country breakdown
pub const COUNTRY_ROW_LIMIT: u32 = 10;

// =============================================================================
// HTTP
// =============================================================================

/// Default request body limit (1MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Body limit for auth endpoints (64KB)
pub const AUTH_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "sitepulse.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Database Backends
// =============================================================================

pub const ENV_TRANSACTIONAL_BACKEND: &str = "SITEPULSE_TRANSACTIONAL_BACKEND";
pub const ENV_POSTGRES_URL: &str = "SITEPULSE_POSTGRES_URL";

// =============================================================================
// PostgreSQL Pool Defaults
// =============================================================================

pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const POSTGRES_DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const POSTGRES_DEFAULT_MAX_LIFETIME_SECS: u64 = 1800;
pub const POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between PostgreSQL health checks
pub const POSTGRES_HEALTH_CHECK_INTERVAL_SECS: u64 = 60;
