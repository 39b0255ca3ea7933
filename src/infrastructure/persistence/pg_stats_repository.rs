//! PostgreSQL implementation of the daily click counter.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::DailyClicks;
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct DailyRow {
    day: NaiveDate,
    clicks: i64,
}

/// PostgreSQL repository for `link_click_daily`.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment_daily(&self, code: &str, day: NaiveDate) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO link_click_daily (link_id, day, clicks)
            SELECT id, $2::date, 1 FROM links WHERE code = $1
            ON CONFLICT (link_id, day)
            DO UPDATE SET clicks = link_click_daily.clicks + 1
            "#,
        )
        .bind(code)
        .bind(day)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn daily_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT day, clicks
            FROM link_click_daily
            WHERE link_id = $1 AND day BETWEEN $2 AND $3
            ORDER BY day ASC
            "#,
        )
        .bind(link_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyClicks::new(r.day, r.clicks))
            .collect())
    }
}
