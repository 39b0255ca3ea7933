//! Per-day click counters.

use chrono::NaiveDate;
use serde::Serialize;

/// Number of successful redirects for one link on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClicks {
    pub day: NaiveDate,
    pub clicks: i64,
}

impl DailyClicks {
    pub fn new(day: NaiveDate, clicks: i64) -> Self {
        Self { day, clicks }
    }
}

/// Sums a series of daily counters.
pub fn total_clicks(days: &[DailyClicks]) -> i64 {
    days.iter().map(|d| d.clicks).sum()
}
