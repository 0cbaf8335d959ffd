//! Site registry repository

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
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

/// List all sites for a user, oldest first
pub async fn list_sites(pool: &SqlitePool, user_id: &str) -> Result<Vec<SiteRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE user_id = ? ORDER BY created_at, id",
        SITE_COLUMNS
    );
    let rows: Vec<SiteTuple> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// List visible sites for a user, oldest first
pub async fn list_visible_sites(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<SiteRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE user_id = ? AND is_visible = 1 ORDER BY created_at, id",
        SITE_COLUMNS
    );
    let rows: Vec<SiteTuple> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(to_row).collect())
}

/// Insert URLs the user has not registered yet; existing rows are left untouched
pub async fn insert_missing_sites(
    pool: &SqlitePool,
    user_id: &str,
    urls: &[String],
) -> Result<usize, SqliteError> {
    let urls = dedup_urls(urls);
    if urls.is_empty() {
        return Ok(0);
    }

    let now = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    // Each row lands after every existing row for the user, so batches keep
    // discovery order even when the clock has not advanced between them
    for url in &urls {
        let result = sqlx::query(
            r#"
            INSERT INTO user_sites (id, user_id, site_url, display_name, ga4_property_id, is_visible, created_at, updated_at)
            SELECT ?, ?, ?, ?, NULL, 1, next.ts, next.ts
            FROM (
                SELECT MAX(?, COALESCE(MAX(created_at) + 1, 0)) AS ts
                FROM user_sites WHERE user_id = ?
            ) AS next
            WHERE true
            ON CONFLICT (user_id, site_url) DO NOTHING
            "#,
        )
        .bind(cuid2::create_id())
        .bind(user_id)
        .bind(*url)
        .bind(default_display_name(url))
        .bind(now)
        .bind(user_id)
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
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<SiteRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM user_sites WHERE id = ? AND user_id = ?",
        SITE_COLUMNS
    );
    let row: Option<SiteTuple> = sqlx::query_as(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(to_row))
}

/// Apply a partial update to a site owned by `user_id`
///
/// Returns `None` when no such site exists for this user.
pub async fn update_site(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    update: &SiteUpdate,
) -> Result<Option<SiteRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp_millis();
    let (set_property, property) = match &update.ga4_property_id {
        Some(value) => (true, value.clone()),
        None => (false, None),
    };

    let result = sqlx::query(
        r#"
        UPDATE user_sites SET
            display_name = COALESCE(?, display_name),
            is_visible = COALESCE(?, is_visible),
            ga4_property_id = CASE WHEN ? THEN ? ELSE ga4_property_id END,
            updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(update.display_name.as_deref())
    .bind(update.is_visible)
    .bind(set_property)
    .bind(property)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_site(pool, user_id, id).await
}

pub async fn ping(pool: &SqlitePool) -> Result<(), SqliteError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::schema::SCHEMA;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        pool
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_insert_missing_sites_defaults() {
        let pool = setup_test_pool().await;

        let inserted = insert_missing_sites(&pool, "u1", &urls(&["https://a.com/", "sc-domain:b.com"]))
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let sites = list_sites(&pool, "u1").await.unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].site_url, "https://a.com/");
        assert_eq!(sites[0].display_name, "a.com");
        assert!(sites[0].is_visible);
        assert!(sites[0].ga4_property_id.is_none());
        assert_eq!(sites[1].display_name, "sc-domain:b.com");
    }

    #[tokio::test]
    async fn test_later_batch_sorts_after_earlier_rows() {
        let pool = setup_test_pool().await;
        insert_missing_sites(&pool, "u1", &urls(&["a.com", "b.com", "c.com"]))
            .await
            .unwrap();
        // Earlier rows stamped ahead of the clock, as a batch finishing within the same millisecond would be
        let ahead = chrono::Utc::now().timestamp_millis() + 60_000;
        sqlx::query("UPDATE user_sites SET created_at = ? WHERE site_url = 'c.com'")
            .bind(ahead)
            .execute(&pool)
            .await
            .unwrap();

        insert_missing_sites(&pool, "u1", &urls(&["d.com", "e.com"]))
            .await
            .unwrap();

        let sites = list_sites(&pool, "u1").await.unwrap();
        let order: Vec<&str> = sites.iter().map(|s| s.site_url.as_str()).collect();
        assert_eq!(order, ["a.com", "b.com", "c.com", "d.com", "e.com"]);
        assert_eq!(sites[3].created_at, ahead + 1);
        assert_eq!(sites[4].created_at, ahead + 2);

        // Another user's rows do not push this user's clock
        insert_missing_sites(&pool, "u2", &urls(&["z.com"])).await.unwrap();
        let other = list_sites(&pool, "u2").await.unwrap();
        assert!(other[0].created_at < ahead);
    }

    #[tokio::test]
    async fn test_insert_missing_sites_is_idempotent() {
        let pool = setup_test_pool().await;
        insert_missing_sites(&pool, "u1", &urls(&["https://a.com/"]))
            .await
            .unwrap();
        let site = list_sites(&pool, "u1").await.unwrap().remove(0);
        update_site(
            &pool,
            "u1",
            &site.id,
            &SiteUpdate {
                display_name: Some("Main".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let inserted = insert_missing_sites(
            &pool,
            "u1",
            &urls(&["https://a.com/", "https://c.com/", "", "https://c.com/"]),
        )
        .await
        .unwrap();
        assert_eq!(inserted, 1);

        let sites = list_sites(&pool, "u1").await.unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].display_name, "Main");
        assert_eq!(sites[1].site_url, "https://c.com/");
    }

    #[tokio::test]
    async fn test_same_url_for_different_users() {
        let pool = setup_test_pool().await;
        insert_missing_sites(&pool, "u1", &urls(&["https://a.com/"]))
            .await
            .unwrap();
        let inserted = insert_missing_sites(&pool, "u2", &urls(&["https://a.com/"]))
            .await
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(list_sites(&pool, "u1").await.unwrap().len(), 1);
        assert_eq!(list_sites(&pool, "u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_site_fields() {
        let pool = setup_test_pool().await;
        insert_missing_sites(&pool, "u1", &urls(&["https://a.com/"]))
            .await
            .unwrap();
        let site = list_sites(&pool, "u1").await.unwrap().remove(0);

        let updated = update_site(
            &pool,
            "u1",
            &site.id,
            &SiteUpdate {
                is_visible: Some(false),
                ga4_property_id: Some(Some("123".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(!updated.is_visible);
        assert_eq!(updated.ga4_property_id.as_deref(), Some("123"));
        assert_eq!(updated.display_name, "a.com");

        assert!(list_visible_sites(&pool, "u1").await.unwrap().is_empty());

        // Explicit null unlinks the property
        let cleared = update_site(
            &pool,
            "u1",
            &site.id,
            &SiteUpdate {
                ga4_property_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(cleared.ga4_property_id.is_none());
        assert!(!cleared.is_visible);
    }

    #[tokio::test]
    async fn test_update_site_other_user_not_found() {
        let pool = setup_test_pool().await;
        insert_missing_sites(&pool, "owner", &urls(&["https://a.com/"]))
            .await
            .unwrap();
        let site = list_sites(&pool, "owner").await.unwrap().remove(0);

        let result = update_site(
            &pool,
            "intruder",
            &site.id,
            &SiteUpdate {
                display_name: Some("hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(result.is_none());

        let unchanged = get_site(&pool, "owner", &site.id).await.unwrap().unwrap();
        assert_eq!(unchanged.display_name, "a.com");
        assert!(get_site(&pool, "intruder", &site.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_site() {
        let pool = setup_test_pool().await;
        let result = update_site(&pool, "u1", "nope", &SiteUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let pool = setup_test_pool().await;
        ping(&pool).await.unwrap();
    }
}
