//! Site registry repository for PostgreSQL

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::traits::dedup_urls;
use crate::data::types::{SiteRow, SiteUpdate};
use crate::utils::url::default_display_name;

type SiteTuple = (
    String,
    String,
    String,
    String,
    Option<String>,
    bool,
    i64,
    i64,
);

const SITE_COLUMNS: &str = "id, user_id, site_url, display_name, ga4_property_id, is_visible, created_at, updated_at";

fn to_row(t: SiteTuple) -> SiteRow {
    SiteRow {
        id: t.0,
        user_id: t.1,
        site_url: t.2,
        display_name: t.3,
        ga4_property_id: t.4,
        is_visible: t.5,
        created_at: t.6,
        updated_at: t.7,
    }
}

pub async fn list_sites(pool: &PgPool, user_id: &str) -> Result<Vec<SiteRow>, PostgresError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE user_id = $1 ORDER BY created_at, id",
        SITE_COLUMNS
    );
    let rows: Vec<SiteTuple> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(to_row).collect())
}

pub async fn list_visible_sites(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<SiteRow>, PostgresError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE user_id = $1 AND is_visible ORDER BY created_at, id",
        SITE_COLUMNS
    );
    let rows: Vec<SiteTuple> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(to_row).collect())
}

pub async fn insert_missing_sites(
    pool: &PgPool,
    user_id: &str,
    urls: &[String],
) -> Result<usize, PostgresError> {
    let urls = dedup_urls(urls);
    if urls.is_empty() {
        return Ok(0);
    }

    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    // Serialize batches per user so each row lands after every existing one
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for url in &urls {
        let result = sqlx::query(
            r#"
            INSERT INTO user_sites (id, user_id, site_url, display_name, ga4_property_id, is_visible, created_at, updated_at)
            SELECT $1, $2, $3, $4, NULL, TRUE, next.ts, next.ts
            FROM (
                SELECT GREATEST($5, COALESCE(MAX(created_at) + 1, 0)) AS ts
                FROM user_sites WHERE user_id = $2
            ) AS next
            ON CONFLICT (user_id, site_url) DO NOTHING
            "#,
        )
        .bind(cuid2::create_id())
        .bind(user_id)
        .bind(*url)
        .bind(default_display_name(url))
        .bind(now)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected() as usize;
    }

    tx.commit().await?;

    if inserted > 0 {
        tracing::debug!(user_id, inserted, "Registered discovered sites");
    }
    Ok(inserted)
}

pub async fn get_site(
    pool: &PgPool,
    user_id: &str,
    id: &str,
) -> Result<Option<SiteRow>, PostgresError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE id = $1 AND user_id = $2",
        SITE_COLUMNS
    );
    let row: Option<SiteTuple> = sqlx::query_as(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

/// Update and return the row in one round trip; `None` when the user owns no such site
pub async fn update_site(
    pool: &PgPool,
    user_id: &str,
    id: &str,
    update: &SiteUpdate,
) -> Result<Option<SiteRow>, PostgresError> {
    let now = chrono::Utc::now().timestamp_millis();
    let (set_property, property) = match &update.ga4_property_id {
        Some(value) => (true, value.clone()),
        None => (false, None),
    };

    let sql = format!(
        r#"
        UPDATE user_sites SET
            display_name = COALESCE($1, display_name),
            is_visible = COALESCE($2, is_visible),
            ga4_property_id = CASE WHEN $3 THEN $4 ELSE ga4_property_id END,
            updated_at = $5
        WHERE id = $6 AND user_id = $7
        RETURNING {}
        "#,
        SITE_COLUMNS
    );
    let row: Option<SiteTuple> = sqlx::query_as(&sql)
        .bind(update.display_name.as_deref())
        .bind(update.is_visible)
        .bind(set_property)
        .bind(property)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

pub async fn ping(pool: &PgPool) -> Result<(), PostgresError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
