//! Site registry endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::Auth;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::data::{SiteRow, SiteUpdate, TransactionalService};

const MAX_PROPERTY_ID_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteDto {
    pub id: String,
    pub site_url: String,
    pub display_name: String,
    pub ga4_property_id: Option<String>,
    pub is_visible: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SiteRow> for SiteDto {
    fn from(row: SiteRow) -> Self {
        Self {
            id: row.id,
            site_url: row.site_url,
            display_name: row.display_name,
            ga4_property_id: row.ga4_property_id,
            is_visible: row.is_visible,
            created_at: DateTime::from_timestamp_millis(row.created_at),
            updated_at: DateTime::from_timestamp_millis(row.updated_at),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`)
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSiteRequest {
    #[validate(length(min = 1, max = 64, message = "id must be 1-64 characters"))]
    pub id: String,
    #[validate(length(min = 1, max = 200, message = "display_name must be 1-200 characters"))]
    pub display_name: Option<String>,
    pub is_visible: Option<bool>,
    /// Numeric GA4 property id; `null` or `""` unlinks
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub ga4_property_id: Option<Option<String>>,
}

/// Accepts `123456` or `properties/123456`; blank unlinks
fn normalize_property_id(value: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    let id = trimmed.strip_prefix("properties/").unwrap_or(trimmed);
    if id.is_empty() {
        return Ok(None);
    }
    if id.len() > MAX_PROPERTY_ID_LEN || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::bad_request(
            "INVALID_PROPERTY_ID",
            "ga4_property_id must be a numeric GA4 property id",
        ));
    }
    Ok(Some(id.to_string()))
}

impl UpdateSiteRequest {
    fn into_update(self) -> Result<(String, SiteUpdate), ApiError> {
        let ga4_property_id = match self.ga4_property_id {
            Some(value) => Some(normalize_property_id(value)?),
            None => None,
        };
        let display_name = match self.display_name.as_deref().map(str::trim) {
            Some("") => {
                return Err(ApiError::bad_request(
                    "VALIDATION_ERROR",
                    "display_name must not be blank",
                ));
            }
            other => other.map(str::to_string),
        };
        let update = SiteUpdate {
            display_name,
            is_visible: self.is_visible,
            ga4_property_id,
        };
        Ok((self.id, update))
    }
}

#[derive(Clone)]
pub struct SitesState {
    pub database: Arc<TransactionalService>,
}

pub fn routes(database: Arc<TransactionalService>) -> Router {
    Router::new()
        .route("/", get(list_sites).patch(update_site))
        .with_state(SitesState { database })
}

fn site_not_found(id: &str) -> ApiError {
    ApiError::not_found("SITE_NOT_FOUND", format!("Site not found: {}", id))
}

/// Caller's sites in creation order
#[utoipa::path(
    get,
    path = "/api/v1/sites",
    tag = "sites",
    responses(
        (status = 200, description = "Registered sites", body = Vec<SiteDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_sites(
    State(state): State<SitesState>,
    auth: Auth,
) -> Result<Json<Vec<SiteDto>>, ApiError> {
    let sites = state
        .database
        .repository()
        .list_sites(auth.user_id())
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(sites.into_iter().map(SiteDto::from).collect()))
}

/// Rename, show/hide, or link/unlink a GA4 property
#[utoipa::path(
    patch,
    path = "/api/v1/sites",
    tag = "sites",
    request_body = UpdateSiteRequest,
    responses(
        (status = 200, description = "Updated site", body = SiteDto),
        (status = 400, description = "Invalid patch"),
        (status = 404, description = "Site not found for this user")
    )
)]
pub async fn update_site(
    State(state): State<SitesState>,
    auth: Auth,
    ValidatedJson(request): ValidatedJson<UpdateSiteRequest>,
) -> Result<Json<SiteDto>, ApiError> {
    let (id, update) = request.into_update()?;
    let repo = state.database.repository();

    let site = if update.is_empty() {
        repo.get_site(auth.user_id(), &id).await
    } else {
        repo.update_site(auth.user_id(), &id, &update).await
    }
    .map_err(ApiError::from_data)?
    .ok_or_else(|| site_not_found(&id))?;

    tracing::debug!(site_id = %site.id, "Site updated");
    Ok(Json(site.into()))
}
