//! GA4 totals and the per-property detail view

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::ReportsState;
use crate::api::auth::Auth;
use crate::api::types::{ApiError, RangeQuery, parse_range};
use crate::domain::TrafficTotals;
use crate::domain::fanout::fan_out;
use crate::domain::fetch::TrafficTrends;

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsRow {
    pub site_url: String,
    pub property_id: String,
    #[serde(flatten)]
    pub totals: TrafficTotals,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdvancedQuery {
    /// GA4 property id
    pub property: Option<String>,
    pub range: Option<String>,
}

/// Traffic totals for visible sites linked to a GA4 property
#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    tag = "reports",
    params(RangeQuery),
    responses(
        (status = 200, description = "Traffic totals per linked site", body = Vec<AnalyticsRow>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn analytics(
    State(state): State<ReportsState>,
    auth: Auth,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<AnalyticsRow>>, ApiError> {
    let window = query.date_range()?.current_window();
    let linked: Vec<(String, String)> = state
        .database
        .repository()
        .list_visible_sites(auth.user_id())
        .await
        .map_err(ApiError::from_data)?
        .into_iter()
        .filter_map(|site| site.ga4_property_id.map(|id| (site.site_url, id)))
        .collect();

    let fetcher = &state.fetcher;
    let token = auth.access_token();
    let rows = fan_out(linked, |(site_url, property_id)| async move {
        let totals = fetcher.traffic_totals(token, &property_id, &window).await;
        AnalyticsRow {
            site_url,
            property_id,
            totals,
        }
    })
    .await;

    Ok(Json(rows))
}

/// Daily series against the previous period, plus device and country breakdowns
#[utoipa::path(
    get,
    path = "/api/v1/analytics/advanced",
    tag = "reports",
    params(AdvancedQuery),
    responses(
        (status = 200, description = "Trend, devices and countries"),
        (status = 400, description = "property param required"),
        (status = 500, description = "GA4 query failed")
    )
)]
pub async fn analytics_advanced(
    State(state): State<ReportsState>,
    auth: Auth,
    Query(query): Query<AdvancedQuery>,
) -> Result<Json<TrafficTrends>, ApiError> {
    let property = query
        .property
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("MISSING_PARAM", "property param required"))?;
    let (current, previous) = parse_range(query.range.as_deref())?.current_comparison();

    let trends = state
        .fetcher
        .traffic_trends(auth.access_token(), property, &current, &previous)
        .await
        .map_err(ApiError::upstream)?;
    Ok(Json(trends))
}
