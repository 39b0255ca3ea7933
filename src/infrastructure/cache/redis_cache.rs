//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, info};

/// Key namespace for cached redirects.
pub const KEY_PREFIX: &str = "short:";

/// Redis cache for redirect lookups.
///
/// Shares a `ConnectionManager`, which reconnects transparently and is cheap to
/// clone per call.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Wraps an established connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Constructs the full Redis key with namespace prefix.
    pub fn build_key(short_code: &str) -> String {
        format!("{}{}", KEY_PREFIX, short_code)
    }
}

/// Opens a connection manager and PINGs it.
///
/// Shared by the cache and the rate-limit counter store so both use one
/// connection.
pub async fn connect_manager(redis_url: &str) -> CacheResult<ConnectionManager> {
    info!("Connecting to Redis");

    let client = redis::Client::open(redis_url).map_err(|e| {
        CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
    })?;

    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e)))?;

    let mut test_conn = manager.clone();
    test_conn
        .ping::<()>()
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

    info!("Connected to Redis");
    Ok(manager)
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = Self::build_key(short_code);
        let mut conn = self.conn.clone();

        let url = conn.get::<_, Option<String>>(&key).await?;
        match &url {
            Some(_) => debug!("Cache HIT: {}", short_code),
            None => debug!("Cache MISS: {}", short_code),
        }
        Ok(url)
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl_seconds: u64,
    ) -> CacheResult<()> {
        let key = Self::build_key(short_code);
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(&key, original_url, ttl_seconds)
            .await?;
        debug!("Cache SET: {} (TTL: {}s)", short_code, ttl_seconds);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        let key = Self::build_key(short_code);
        let mut conn = self.conn.clone();

        let deleted = conn.del::<_, i64>(&key).await?;
        if deleted > 0 {
            debug!("Cache INVALIDATE: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key() {
        assert_eq!(RedisCache::build_key("abc12345"), "short:abc12345");
    }
}
