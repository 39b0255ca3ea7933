//! Redis counting store.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::trace;

use crate::domain::rate_limit::CounterStore;
use crate::error::AppError;
use crate::infrastructure::cache::CacheError;

/// Rate-limit counters stored in Redis.
///
/// `INCR` is atomic on the server, so concurrent checks from any number of
/// instances each observe a distinct post-increment value.
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str) -> Result<u64, AppError> {
        let mut conn = self.conn.clone();
        let count: u64 = conn.incr(key, 1u64).await.map_err(CacheError::from)?;
        trace!(key, count, "Counter INCR");
        Ok(count)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        conn.expire::<_, ()>(key, seconds)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }

    /// `SET key 0 NX EX ttl` and `INCR key` in one MULTI/EXEC, so the key
    /// never exists without its expiry.
    async fn increment_expiring(&self, key: &str, ttl_seconds: u64) -> Result<u64, AppError> {
        let mut conn = self.conn.clone();

        let (count,): (u64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(key)
            .arg(0)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds.max(1))
            .ignore()
            .incr(key, 1u64)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;

        trace!(key, count, "Counter INCR");
        Ok(count)
    }
}
