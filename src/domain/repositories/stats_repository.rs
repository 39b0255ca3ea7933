//! Repository trait for per-day click counters.

use crate::domain::entities::DailyClicks;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage for the daily redirect counter.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Adds one click for the link with `code` on `day`.
    ///
    /// Returns `Ok(false)` if no link has this code.
    async fn increment_daily(&self, code: &str, day: NaiveDate) -> Result<bool, AppError>;

    /// Returns the daily counters of a link within `[from, to]`, oldest first.
    /// Days without clicks are omitted.
    async fn daily_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyClicks>, AppError>;
}
