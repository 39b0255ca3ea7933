//! Stand-in cache for deployments without Redis.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;

/// Stores nothing: lookups miss, writes and invalidations succeed, so every
/// redirect goes to the link store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(&self, _: &str, _: &str, _: u64) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
