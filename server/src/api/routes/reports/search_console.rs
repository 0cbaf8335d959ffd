//! Search Console totals per visible site

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ReportsState, sync_discovered_sites};
use crate::api::auth::Auth;
use crate::api::routes::sites::SiteDto;
use crate::api::types::{ApiError, RangeQuery};
use crate::domain::SearchTotals;
use crate::domain::fanout::fan_out;

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchConsoleRow {
    #[serde(flatten)]
    pub site: SiteDto,
    #[serde(flatten)]
    pub totals: SearchTotals,
    /// Always 0 here; traffic comes from `/analytics`
    pub visitors: u64,
    pub sessions: u64,
}

/// Sync newly discovered sites, then fetch search totals for every visible site
#[utoipa::path(
    get,
    path = "/api/v1/search-console",
    tag = "reports",
    params(RangeQuery),
    responses(
        (status = 200, description = "Search totals per visible site", body = Vec<SearchConsoleRow>),
        (status = 400, description = "Unknown range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search_console(
    State(state): State<ReportsState>,
    auth: Auth,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<SearchConsoleRow>>, ApiError> {
    let window = query.date_range()?.current_window();
    sync_discovered_sites(&state, &auth).await?;

    let sites = state
        .database
        .repository()
        .list_visible_sites(auth.user_id())
        .await
        .map_err(ApiError::from_data)?;

    let fetcher = &state.fetcher;
    let token = auth.access_token();
    let rows = fan_out(sites, |site| async move {
        let totals = fetcher.search_totals(token, &site.site_url, &window).await;
        SearchConsoleRow {
            site: site.into(),
            totals,
            visitors: 0,
            sessions: 0,
        }
    })
    .await;

    Ok(Json(rows))
}
