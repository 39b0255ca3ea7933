//! Redirect cache.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Shared Redis-backed cache
//! - [`NullCache`] - No-op implementation for disabled caching

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::{RedisCache, connect_manager};
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
