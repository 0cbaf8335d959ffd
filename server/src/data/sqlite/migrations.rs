//! Schema versioning
//!
//! A fresh database gets `SCHEMA` in one transaction. Existing databases run
//! every step in `STEPS` above their recorded version, each in its own
//! transaction and logged in `schema_migrations`.

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::error::SqliteError;
use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::utils::crypto::sha256_hex;

/// Incremental steps above version 1: (version, name, sql)
const STEPS: &[(i32, &str, &str)] = &[];

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteError> {
    let initialized: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !initialized {
        tracing::debug!(version = SCHEMA_VERSION, "Creating SQLite schema");
        return create_schema(pool).await;
    }

    let current: i32 = sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
        .fetch_optional(pool)
        .await?
        .unwrap_or(0);

    if current >= SCHEMA_VERSION {
        tracing::debug!(version = current, "SQLite schema is up to date");
        return Ok(());
    }

    for version in (current + 1)..=SCHEMA_VERSION {
        let Some((_, name, sql)) = STEPS.iter().find(|(v, _, _)| *v == version) else {
            return Err(SqliteError::MigrationFailed {
                version,
                name: "unknown".to_string(),
                error: format!("No migration step for version {}", version),
            });
        };
        apply_step(pool, version, name, sql).await?;
    }

    Ok(())
}

async fn create_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA).execute(&mut *tx).await?;

    let now = chrono::Utc::now().timestamp_millis();
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, ?, ?, 'Initial schema')",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    record_step(&mut tx, SCHEMA_VERSION, "initial_schema", SCHEMA, now, start).await?;
    tx.commit().await?;
    Ok(())
}

async fn apply_step(
    pool: &SqlitePool,
    version: i32,
    name: &str,
    sql: &str,
) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();
    let mut tx = pool.begin().await?;

    for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| SqliteError::MigrationFailed {
                version,
                name: name.to_string(),
                error: format!("{} ({})", e, &statement[..statement.len().min(50)]),
            })?;
    }

    let now = chrono::Utc::now().timestamp_millis();
    sqlx::query("UPDATE schema_version SET version = ?, applied_at = ?, description = ? WHERE id = 1")
        .bind(version)
        .bind(now)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    record_step(&mut tx, version, name, sql, now, start).await?;
    tx.commit().await?;
    Ok(())
}

async fn record_step(
    tx: &mut Transaction<'_, Sqlite>,
    version: i32,
    name: &str,
    sql: &str,
    applied_at: i64,
    start: std::time::Instant,
) -> Result<(), SqliteError> {
    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(version)
    .bind(name)
    .bind(applied_at)
    .bind(sha256_hex(sql))
    .bind(elapsed_ms)
    .execute(&mut **tx)
    .await?;

    tracing::debug!(version, name, elapsed_ms, "Recorded schema step");
    Ok(())
}
