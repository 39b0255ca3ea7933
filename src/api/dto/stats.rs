//! DTOs for per-link click statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::entities::DailyClicks;

/// Query parameters for `GET /api/links/{id}/stats`.
///
/// Dates are inclusive calendar days (`YYYY-MM-DD`, UTC).
#[derive(Debug, Default, Deserialize)]
pub struct StatsQueryParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Daily click counts of one link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub id: i64,
    pub code: String,
    pub total: i64,
    pub items: Vec<DailyClicks>,
}
