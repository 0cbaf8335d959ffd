//! PostgreSQL schema versioning

use sqlx::PgPool;

use super::error::PostgresError;
use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::utils::crypto::sha256_hex;

/// Incremental steps above version 1: (version, name, sql)
const STEPS: &[(i32, &str, &str)] = &[];

pub async fn run_migrations(pool: &PgPool) -> Result<(), PostgresError> {
    let initialized: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name = 'schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    let current: Option<i32> = if initialized {
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
    } else {
        None
    };

    match current {
        None => create_schema(pool).await,
        Some(v) if v < SCHEMA_VERSION => {
            tracing::debug!(from = v, to = SCHEMA_VERSION, "Migrating PostgreSQL schema");
            for version in (v + 1)..=SCHEMA_VERSION {
                apply_step(pool, version).await?;
            }
            Ok(())
        }
        Some(v) if v > SCHEMA_VERSION => {
            tracing::warn!(
                database = v,
                supported = SCHEMA_VERSION,
                "PostgreSQL schema is newer than this build"
            );
            Ok(())
        }
        Some(_) => {
            tracing::debug!(version = SCHEMA_VERSION, "PostgreSQL schema is up to date");
            Ok(())
        }
    }
}

async fn create_schema(pool: &PgPool) -> Result<(), PostgresError> {
    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(SCHEMA).execute(&mut *tx).await?;

    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description)
         VALUES (1, $1, $2, 'Initial schema')
         ON CONFLICT (id) DO UPDATE SET version = $1, applied_at = $2",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(version = SCHEMA_VERSION, "PostgreSQL schema created");
    Ok(())
}

async fn apply_step(pool: &PgPool, version: i32) -> Result<(), PostgresError> {
    let Some((_, name, sql)) = STEPS.iter().find(|(v, _, _)| *v == version) else {
        return Err(PostgresError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("No migration step for version {}", version),
        });
    };

    let start = std::time::Instant::now();
    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(sql)
        .execute(&mut *tx)
        .await
        .map_err(|e| PostgresError::MigrationFailed {
            version,
            name: name.to_string(),
            error: e.to_string(),
        })?;

    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success)
         VALUES ($1, $2, $3, $4, $5, TRUE)",
    )
    .bind(version)
    .bind(*name)
    .bind(now)
    .bind(sha256_hex(sql))
    .bind(elapsed_ms)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE schema_version SET version = $1, applied_at = $2, description = $3 WHERE id = 1")
        .bind(version)
        .bind(now)
        .bind(*name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!(version, name, elapsed_ms, "PostgreSQL migration applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_match_schema_version() {
        assert_eq!(STEPS.len() as i32, SCHEMA_VERSION - 1);
        for (version, name, sql) in STEPS {
            assert!(*version > 1 && *version <= SCHEMA_VERSION, "{}", name);
            assert!(!sql.trim().is_empty());
        }
    }
}
