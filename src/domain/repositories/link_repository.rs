//! Repository trait for the durable link store.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable storage for links.
///
/// The store owns the uniqueness of `code`: [`LinkRepository::insert`] is the
/// authoritative arbiter when two creators race for the same code.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Point lookup by short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Point lookup by link id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists at commit time.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Applies a partial update and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError>;

    /// Lists an owner's links, newest first.
    ///
    /// `page` is 1-indexed.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts an owner's links.
    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError>;

    /// Checks that the store answers queries.
    async fn health_check(&self) -> bool;
}
