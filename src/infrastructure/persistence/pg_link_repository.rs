//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, owner_id, code, original_url, is_enabled, expires_at, created_at";

#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    owner_id: String,
    code: String,
    original_url: String,
    is_enabled: bool,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.owner_id,
            r.code,
            r.original_url,
            r.is_enabled,
            r.expires_at,
            r.created_at,
        )
    }
}

/// PostgreSQL repository for links.
///
/// `links.code` carries the `links_code_key` unique index; a violation on
/// insert is reported as [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO links (owner_id, code, original_url, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.owner_id)
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let (set_expiry, expires_at) = match patch.expires_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            UPDATE links
            SET is_enabled = COALESCE($2, is_enabled),
                expires_at = CASE WHEN $3 THEN $4 ELSE expires_at END
            WHERE id = $1
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.is_enabled)
        .bind(set_expiry)
        .bind(expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError> {
        let offset = (page.max(1) - 1) * page_size;

        let rows = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(owner_id)
        .bind(page_size)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
