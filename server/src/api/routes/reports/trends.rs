//! Search Console detail view for one site

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::ReportsState;
use crate::api::auth::Auth;
use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, parse_range};
use crate::domain::fetch::SearchTrends;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendsQuery {
    /// Search Console property, e.g. `https://example.com/` or `sc-domain:example.com`
    #[validate(length(max = 2048, message = "site must be at most 2048 characters"))]
    pub site: Option<String>,
    pub range: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/trends",
    tag = "reports",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Daily trend plus keyword, page and device breakdowns"),
        (status = 400, description = "site param required"),
        (status = 500, description = "Search Console query failed")
    )
)]
pub async fn trends(
    State(state): State<ReportsState>,
    auth: Auth,
    ValidatedQuery(query): ValidatedQuery<TrendsQuery>,
) -> Result<Json<SearchTrends>, ApiError> {
    let site = query
        .site
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("MISSING_PARAM", "site param required"))?;
    let window = parse_range(query.range.as_deref())?.current_window();

    let trends = state
        .fetcher
        .search_trends(auth.access_token(), site, &window)
        .await
        .map_err(ApiError::upstream)?;
    Ok(Json(trends))
}
