//! Symbolic report windows (`7d`, `28d`, `90d`) and their calendar dates

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "28d")]
    Last28Days,
    #[serde(rename = "90d")]
    Last90Days,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid range '{0}'. Valid options: 7d, 28d, 90d")]
pub struct InvalidRange(pub String);

/// Inclusive calendar window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// `YYYY-MM-DD`
    pub fn start_date(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD`
    pub fn end_date(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl DateRange {
    pub fn days(self) -> i64 {
        match self {
            Self::Last7Days => 7,
            Self::Last28Days => 28,
            Self::Last90Days => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last28Days => "28d",
            Self::Last90Days => "90d",
        }
    }

    /// Parse an optional query token; absent or blank means the default window
    pub fn from_query(token: Option<&str>) -> Result<Self, InvalidRange> {
        match token.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(token) => token.parse(),
        }
    }

    /// `[today - N, today]`
    pub fn window(self, today: NaiveDate) -> DateWindow {
        DateWindow {
            start: today - Duration::days(self.days()),
            end: today,
        }
    }

    /// Current window plus the equal-length window that ends where it starts
    pub fn comparison(self, today: NaiveDate) -> (DateWindow, DateWindow) {
        let current = self.window(today);
        let previous = DateWindow {
            start: current.start - Duration::days(self.days()),
            end: current.start,
        };
        (current, previous)
    }

    /// Window ending on the current UTC date
    pub fn current_window(self) -> DateWindow {
        self.window(Utc::now().date_naive())
    }

    /// Comparison pair ending on the current UTC date
    pub fn current_comparison(self) -> (DateWindow, DateWindow) {
        self.comparison(Utc::now().date_naive())
    }
}

impl FromStr for DateRange {
    type Err = InvalidRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Self::Last7Days),
            "28d" => Ok(Self::Last28Days),
            "90d" => Ok(Self::Last90Days),
            other => Err(InvalidRange(other.to_string())),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
