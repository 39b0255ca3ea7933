//! Link creation, retrieval and mutation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use super::cache_invalidator::CacheInvalidator;
use super::code_allocator::CodeAllocator;
use crate::domain::entities::{Actor, Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::url_validator::validate_target_url;

/// Number of allocate+insert rounds before a create gives up on lost races.
pub const MAX_INSERT_ATTEMPTS: usize = 3;

/// Service for creating, reading and updating links on behalf of an actor.
///
/// Creation runs the [`CodeAllocator`] and lets the store's unique constraint
/// settle races. Updates commit to the store first and then drop the cached
/// redirect through the [`CacheInvalidator`].
pub struct LinkService<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    repository: Arc<L>,
    allocator: CodeAllocator<L>,
    invalidator: CacheInvalidator<C>,
    base_url: String,
}

impl<L, C> LinkService<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    /// Creates a link service.
    ///
    /// `base_url` is the public origin short URLs are built on.
    pub fn new(repository: Arc<L>, cache: Arc<C>, base_url: impl Into<String>) -> Self {
        Self {
            allocator: CodeAllocator::new(repository.clone()),
            invalidator: CacheInvalidator::new(cache),
            repository,
            base_url: base_url.into(),
        }
    }

    /// Replaces the default allocator.
    pub fn with_allocator(mut self, allocator: CodeAllocator<L>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Creates a link owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `original_url` is not an absolute
    /// http(s) URL.
    /// Returns [`AppError::AllocationExhausted`] if no free code was found, or
    /// if every insert lost its code to a concurrent creator.
    /// Returns [`AppError::StoreUnavailable`] on store failures.
    pub async fn create(
        &self,
        actor: &Actor,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        validate_target_url(original_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL format",
                json!({ "field": "original_url", "reason": e.to_string() }),
            )
        })?;

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let code = self.allocator.allocate().await?;

            let new_link = NewLink {
                owner_id: actor.id.clone(),
                code,
                original_url: original_url.to_string(),
                expires_at,
            };

            match self.repository.insert(new_link).await {
                Ok(link) => {
                    info!(link_id = link.id, code = %link.code, owner = %link.owner_id, "Link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Short code taken at insert, allocating again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::allocation_exhausted(
            "Could not generate a unique short code",
            json!({ "insert_attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    /// Loads a link the actor may manage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Forbidden`] if the actor is neither owner nor admin.
    pub async fn get(&self, id: i64, actor: &Actor) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if !actor.can_manage(&link.owner_id) {
            return Err(AppError::forbidden(
                "Not allowed to access this link",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Lists the actor's own links, newest first, with the total count.
    ///
    /// `page` is 1-indexed.
    pub async fn list(
        &self,
        actor: &Actor,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Link>, i64), AppError> {
        let items = self
            .repository
            .list_by_owner(&actor.id, page, page_size)
            .await?;
        let total = self.repository.count_by_owner(&actor.id).await?;

        Ok((items, total))
    }

    /// Applies `patch` to a link the actor may manage.
    ///
    /// The cached redirect is dropped after the store write. A failed
    /// invalidation is logged and does not fail the update; the stale entry
    /// expires with its TTL.
    ///
    /// # Errors
    ///
    /// See [`Self::get`]. Store failures surface as
    /// [`AppError::StoreUnavailable`].
    pub async fn update(&self, id: i64, actor: &Actor, patch: LinkPatch) -> Result<Link, AppError> {
        let link = self.get(id, actor).await?;
        if patch.is_empty() {
            return Ok(link);
        }

        let updated = self.repository.update(id, patch).await?;
        info!(link_id = id, code = %updated.code, enabled = updated.is_enabled, "Link updated");

        if let Err(e) = self.invalidator.invalidate(&updated.code).await {
            warn!(code = %updated.code, error = %e, "Cache invalidation failed");
        }

        Ok(updated)
    }

    /// Public URL for a code: `<base_url>/r/<code>`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url.trim_end_matches('/'), code)
    }
}
