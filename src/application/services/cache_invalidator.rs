//! Removal of stale redirect cache entries.

use std::sync::Arc;

use tracing::debug;

use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Deletes the cached URL of a code after its link changed.
///
/// Must run after the store write has committed. A resolve that read the old
/// row before the commit can still write it back after this call; that entry
/// lives at most one TTL.
pub struct CacheInvalidator<C: CacheService + ?Sized> {
    cache: Arc<C>,
}

impl<C: CacheService + ?Sized> CacheInvalidator<C> {
    pub fn new(cache: Arc<C>) -> Self {
        Self { cache }
    }

    /// Removes the entry for `code`. A missing entry counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StoreUnavailable`] if the cache call fails. Callers
    /// on a mutation path log this and carry on.
    pub async fn invalidate(&self, code: &str) -> Result<(), AppError> {
        self.cache.invalidate(code).await?;
        debug!(code, "Invalidated redirect cache entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, MockCacheService};

    #[tokio::test]
    async fn test_invalidate_deletes_entry() {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|code| code == "abc12345")
            .times(1)
            .returning(|_| Ok(()));

        let invalidator = CacheInvalidator::new(Arc::new(cache));
        assert!(invalidator.invalidate("abc12345").await.is_ok());
    }

    #[tokio::test]
    async fn test_invalidate_surfaces_cache_failure() {
        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .times(1)
            .returning(|_| Err(CacheError::ConnectionError("refused".to_string())));

        let invalidator = CacheInvalidator::new(Arc::new(cache));
        assert!(matches!(
            invalidator.invalidate("abc12345").await.unwrap_err(),
            AppError::StoreUnavailable { .. }
        ));
    }
}
