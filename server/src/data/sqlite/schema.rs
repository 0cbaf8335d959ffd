//! SQLite schema
//!
//! `SCHEMA` always describes the latest version. Databases created at an
//! older version are brought forward by the steps in `migrations.rs`.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA: &str = r#"
-- ============================================================================
-- Schema tracking
-- ============================================================================

CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER NOT NULL,
    success INTEGER NOT NULL DEFAULT 1
);

-- ============================================================================
-- Site registry
-- ============================================================================

CREATE TABLE IF NOT EXISTS user_sites (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    site_url TEXT NOT NULL,
    display_name TEXT NOT NULL,
    ga4_property_id TEXT,
    is_visible INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE (user_id, site_url)
);

CREATE INDEX IF NOT EXISTS idx_user_sites_user ON user_sites(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_user_sites_visible ON user_sites(user_id, is_visible, created_at);
"#;
