//! Server-side merge of both reports for the dashboard view

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ReportsState, sync_discovered_sites};
use crate::api::auth::Auth;
use crate::api::types::{ApiError, RangeQuery};
use crate::domain::fanout::fan_out;
use crate::domain::{DateRange, SiteStats, SummaryStats, merge_sites, summarize};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = String, example = "28d")]
    pub range: DateRange,
    /// Every registered site, hidden ones included
    pub sites: Vec<SiteStats>,
    /// Aggregate over visible sites only
    pub summary: SummaryStats,
}

/// Merged per-site statistics and the visible-site summary
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "reports",
    params(RangeQuery),
    responses(
        (status = 200, description = "Merged statistics", body = DashboardResponse),
        (status = 400, description = "Unknown range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn dashboard(
    State(state): State<ReportsState>,
    auth: Auth,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let range = query.date_range()?;
    let window = range.current_window();
    sync_discovered_sites(&state, &auth).await?;

    let sites = state
        .database
        .repository()
        .list_sites(auth.user_id())
        .await
        .map_err(ApiError::from_data)?;

    // Only visible sites are queried; hidden ones merge as zeros
    let search_targets: Vec<String> = sites
        .iter()
        .filter(|s| s.is_visible)
        .map(|s| s.site_url.clone())
        .collect();
    let traffic_targets: Vec<(String, String)> = sites
        .iter()
        .filter(|s| s.is_visible)
        .filter_map(|s| {
            s.ga4_property_id
                .clone()
                .map(|id| (s.site_url.clone(), id))
        })
        .collect();

    let fetcher = &state.fetcher;
    let token = auth.access_token();
    let (search, traffic) = tokio::join!(
        fan_out(search_targets, |url| async move {
            let totals = fetcher.search_totals(token, &url, &window).await;
            (url, totals)
        }),
        fan_out(traffic_targets, |(url, property_id)| async move {
            let totals = fetcher.traffic_totals(token, &property_id, &window).await;
            (url, totals)
        }),
    );

    let search_by_url: HashMap<_, _> = search.into_iter().collect();
    let traffic_by_url: HashMap<_, _> = traffic.into_iter().collect();
    let stats = merge_sites(sites, &search_by_url, &traffic_by_url);
    let summary = summarize(&stats);

    Ok(Json(DashboardResponse {
        range,
        sites: stats,
        summary,
    }))
}
