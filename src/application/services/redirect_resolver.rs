//! Cache-aside resolution of short codes.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::debug;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_well_formed;

/// Resolves a short code to its original URL.
///
/// # Protocol
///
/// 1. Cache hit: return the cached URL as is. No validity re-check, so a link
///    disabled or expired after caching keeps redirecting until the entry's TTL
///    lapses.
/// 2. Cache miss: load the link by code from the durable store.
/// 3. Absent, disabled or expired: [`AppError::NotFound`], cache untouched.
/// 4. Otherwise write the URL to the cache with the configured TTL and return it.
///
/// Concurrent misses for the same code may both write the cache; they write the
/// same value.
pub struct RedirectResolver<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    repository: Arc<L>,
    cache: Arc<C>,
    ttl_seconds: u64,
}

impl<L, C> RedirectResolver<L, C>
where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    /// Creates a resolver caching successful lookups for `ttl_seconds`.
    pub fn new(repository: Arc<L>, cache: Arc<C>, ttl_seconds: u64) -> Self {
        Self {
            repository,
            cache,
            ttl_seconds,
        }
    }

    /// Returns the original URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link is absent, disabled or
    /// expired; the three cases are indistinguishable.
    /// Returns [`AppError::StoreUnavailable`] if the cache or store fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_well_formed(code) {
            return Err(not_found());
        }

        if let Some(url) = self.cache.get_url(code).await? {
            metrics::counter!("shortlink_redirect_cache_total", "result" => "hit").increment(1);
            debug!(code, "Redirect served from cache");
            return Ok(url);
        }
        metrics::counter!("shortlink_redirect_cache_total", "result" => "miss").increment(1);

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(not_found)?;

        if !link.is_redirectable_at(Utc::now()) {
            debug!(
                code,
                enabled = link.is_enabled,
                "Link is not a valid redirect target"
            );
            return Err(not_found());
        }

        self.cache
            .set_url(code, &link.original_url, self.ttl_seconds)
            .await?;

        Ok(link.original_url)
    }
}

fn not_found() -> AppError {
    AppError::not_found("Link not found or expired", json!({}))
}
