//! Join registry rows with report totals and aggregate the visible sites

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fanout::left_join;
use super::fetch::{SearchTotals, TrafficTotals};
use crate::data::SiteRow;

/// One site with both reports for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SiteStats {
    pub id: String,
    pub site_url: String,
    pub display_name: String,
    pub ga4_property_id: Option<String>,
    pub is_visible: bool,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub position: f64,
    pub visitors: u64,
    pub sessions: u64,
    pub page_views: u64,
    pub new_users: u64,
    pub bounce_rate: f64,
    pub avg_session_duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryStats {
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_visitors: u64,
    pub total_sessions: u64,
    pub total_page_views: u64,
    pub total_new_users: u64,
    pub avg_ctr: f64,
    pub avg_position: f64,
    pub avg_bounce_rate: f64,
    pub avg_session_duration: f64,
    pub sites_count: usize,
}

/// Every site is kept; missing report data counts as zero
pub fn merge_sites(
    sites: Vec<SiteRow>,
    search_by_url: &HashMap<String, SearchTotals>,
    traffic_by_url: &HashMap<String, TrafficTotals>,
) -> Vec<SiteStats> {
    let with_search = left_join(sites, |s| s.site_url.clone(), search_by_url);
    left_join(with_search, |(s, _)| s.site_url.clone(), traffic_by_url)
        .into_iter()
        .map(|((site, search), traffic)| SiteStats {
            id: site.id,
            site_url: site.site_url,
            display_name: site.display_name,
            ga4_property_id: site.ga4_property_id,
            is_visible: site.is_visible,
            impressions: search.impressions,
            clicks: search.clicks,
            ctr: search.ctr,
            position: search.position,
            visitors: traffic.visitors,
            sessions: traffic.sessions,
            page_views: traffic.page_views,
            new_users: traffic.new_users,
            bounce_rate: traffic.bounce_rate,
            avg_session_duration: traffic.avg_session_duration,
        })
        .collect()
}

/// Mean over values above zero; 0 when none qualify
fn mean_of_positive(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| *v > 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Aggregate over visible rows only
pub fn summarize(stats: &[SiteStats]) -> SummaryStats {
    let visible: Vec<&SiteStats> = stats.iter().filter(|s| s.is_visible).collect();

    let total_impressions: u64 = visible.iter().map(|s| s.impressions).sum();
    let total_clicks: u64 = visible.iter().map(|s| s.clicks).sum();
    let avg_ctr = if total_impressions == 0 {
        0.0
    } else {
        total_clicks as f64 / total_impressions as f64
    };

    SummaryStats {
        total_impressions,
        total_clicks,
        total_visitors: visible.iter().map(|s| s.visitors).sum(),
        total_sessions: visible.iter().map(|s| s.sessions).sum(),
        total_page_views: visible.iter().map(|s| s.page_views).sum(),
        total_new_users: visible.iter().map(|s| s.new_users).sum(),
        avg_ctr,
        avg_position: mean_of_positive(visible.iter().map(|s| s.position)),
        avg_bounce_rate: mean_of_positive(visible.iter().map(|s| s.bounce_rate)),
        avg_session_duration: mean_of_positive(visible.iter().map(|s| s.avg_session_duration)),
        sites_count: visible.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str, url: &str, visible: bool) -> SiteRow {
        SiteRow {
            id: id.to_string(),
            user_id: "u1".to_string(),
            site_url: url.to_string(),
            display_name: url.to_string(),
            ga4_property_id: None,
            is_visible: visible,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn search(clicks: u64, impressions: u64, position: f64) -> SearchTotals {
        SearchTotals {
            clicks,
            impressions,
            ctr: 0.0,
            position,
        }
    }

    fn stats(url: &str, visible: bool, search_totals: SearchTotals) -> SiteStats {
        let search = HashMap::from([(url.to_string(), search_totals)]);
        merge_sites(vec![site("s", url, visible)], &search, &HashMap::new()).remove(0)
    }

    #[test]
    fn test_summary_two_sites() {
        let rows = vec![
            stats("a.com", true, search(10, 100, 0.0)),
            stats("b.com", true, search(0, 0, 0.0)),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.total_impressions, 100);
        assert_eq!(summary.total_clicks, 10);
        assert_eq!(summary.avg_ctr, 0.1);
        assert_eq!(summary.sites_count, 2);
    }

    #[test]
    fn test_avg_ctr_zero_without_impressions() {
        let summary = summarize(&[stats("a.com", true, search(0, 0, 0.0))]);
        assert_eq!(summary.avg_ctr, 0.0);
        assert_eq!(summarize(&[]).avg_ctr, 0.0);
    }

    #[test]
    fn test_avg_position_excludes_unranked() {
        let rows = vec![
            stats("a.com", true, search(1, 10, 4.0)),
            stats("b.com", true, search(1, 10, 0.0)),
            stats("c.com", true, search(1, 10, 8.0)),
            stats("d.com", true, search(1, 10, -1.0)),
        ];
        assert_eq!(summarize(&rows).avg_position, 6.0);
    }

    #[test]
    fn test_hidden_sites_excluded_from_summary() {
        let rows = vec![
            stats("a.com", true, search(10, 100, 3.0)),
            stats("b.com", false, search(90, 900, 1.0)),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.sites_count, 1);
        assert_eq!(summary.total_impressions, 100);
        assert_eq!(summary.avg_position, 3.0);
    }

    #[test]
    fn test_merge_keeps_sites_without_reports() {
        let sites = vec![site("1", "https://a.com/", true), site("2", "https://b.com/", false)];
        let traffic = HashMap::from([(
            "https://b.com/".to_string(),
            TrafficTotals {
                visitors: 7,
                sessions: 9,
                bounce_rate: 0.5,
                ..Default::default()
            },
        )]);
        let merged = merge_sites(sites, &HashMap::new(), &traffic);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].visitors, 0);
        assert_eq!(merged[0].impressions, 0);
        assert_eq!(merged[1].visitors, 7);
        assert!(!merged[1].is_visible);
    }

    #[test]
    fn test_traffic_averages_skip_zero() {
        let sites = vec![
            site("1", "a", true),
            site("2", "b", true),
            site("3", "c", true),
        ];
        let traffic = HashMap::from([
            (
                "a".to_string(),
                TrafficTotals {
                    visitors: 10,
                    sessions: 12,
                    page_views: 30,
                    new_users: 4,
                    bounce_rate: 0.4,
                    avg_session_duration: 60.0,
                },
            ),
            (
                "b".to_string(),
                TrafficTotals {
                    visitors: 5,
                    sessions: 6,
                    page_views: 10,
                    new_users: 1,
                    bounce_rate: 0.6,
                    avg_session_duration: 120.0,
                },
            ),
        ]);
        let summary = summarize(&merge_sites(sites, &HashMap::new(), &traffic));
        assert_eq!(summary.total_visitors, 15);
        assert_eq!(summary.total_sessions, 18);
        assert_eq!(summary.total_page_views, 40);
        assert_eq!(summary.total_new_users, 5);
        assert!((summary.avg_bounce_rate - 0.5).abs() < 1e-12);
        assert_eq!(summary.avg_session_duration, 90.0);
        assert_eq!(summary.sites_count, 3);
    }
}
