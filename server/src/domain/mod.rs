//! Report domain
//!
//! - `date_range` - `7d`/`28d`/`90d` windows
//! - `google` - Search Console, GA4 and OAuth clients
//! - `fetch` - report fetchers with zero fallbacks
//! - `fanout` - concurrent fan-out and keyed left join
//! - `merge` - per-site statistics and the visible-site summary

pub mod date_range;
pub mod fanout;
pub mod fetch;
pub mod google;
pub mod merge;

pub use date_range::{DateRange, DateWindow};
pub use fetch::{ReportFetcher, SearchTotals, TrafficTotals};
pub use merge::{SiteStats, SummaryStats, merge_sites, summarize};
