//! Daily click statistics service.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use crate::domain::entities::DailyClicks;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Range used when a caller gives no dates.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Longest range a single query may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Read side of the per-day click counter.
///
/// Access control is the caller's concern; resolve the link through
/// [`crate::application::services::LinkService::get`] first.
pub struct StatsService<R: StatsRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: StatsRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns daily click counts of a link within `[from, to]`.
    ///
    /// Missing bounds default to the last [`DEFAULT_RANGE_DAYS`] days ending
    /// today (UTC).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `from` is after `to` or the range
    /// exceeds [`MAX_RANGE_DAYS`].
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    pub async fn daily_clicks(
        &self,
        link_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let to = to.unwrap_or_else(|| Utc::now().date_naive());
        let from = from.unwrap_or(to - Duration::days(DEFAULT_RANGE_DAYS - 1));

        if from > to {
            return Err(AppError::bad_request(
                "'from' must not be after 'to'",
                json!({ "from": from, "to": to }),
            ));
        }

        if (to - from).num_days() >= MAX_RANGE_DAYS {
            return Err(AppError::bad_request(
                "Date range too large",
                json!({ "max_days": MAX_RANGE_DAYS }),
            ));
        }

        self.repository.daily_clicks(link_id, from, to).await
    }
}
