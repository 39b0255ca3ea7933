//! Fixed-window rate limiting model.
//!
//! A [`RateLimitPolicy`] is attached to each endpoint when routes are built.
//! Counters live in a shared [`CounterStore`] so every instance sees the same
//! count for a given `(scope, identity, window)`.

use async_trait::async_trait;
use std::fmt;

use crate::domain::entities::Actor;
use crate::error::AppError;

/// Identity used when neither an actor nor an address is known.
pub const ANONYMOUS_IDENTITY: &str = "anonymous";

/// Which identity a policy counts requests against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateScope {
    /// Client address.
    Ip,
    /// Authenticated actor, falling back to the client address.
    User,
}

impl RateScope {
    /// Counter key prefix for this scope.
    pub fn prefix(self) -> &'static str {
        match self {
            RateScope::Ip => "rl:ip",
            RateScope::User => "rl:user",
        }
    }

    /// Picks the identity to count against.
    ///
    /// - `Ip`: the client address, else [`ANONYMOUS_IDENTITY`]
    /// - `User`: the actor id, else the client address, else [`ANONYMOUS_IDENTITY`]
    pub fn identity(self, actor: Option<&Actor>, client_ip: Option<&str>) -> String {
        let resolved = match self {
            RateScope::Ip => client_ip,
            RateScope::User => actor.map(|a| a.id.as_str()).or(client_ip),
        };

        resolved.unwrap_or(ANONYMOUS_IDENTITY).to_string()
    }
}

impl fmt::Display for RateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Per-endpoint limit: at most `limit` requests per `window_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub scope: RateScope,
    pub limit: u64,
    pub window_seconds: u64,
}

impl RateLimitPolicy {
    pub fn new(scope: RateScope, limit: u64, window_seconds: u64) -> Self {
        Self {
            scope,
            limit,
            window_seconds,
        }
    }

    /// Index of the window containing `now_secs`.
    ///
    /// A zero window is treated as one second.
    pub fn window_index(&self, now_secs: u64) -> u64 {
        now_secs / self.window_seconds.max(1)
    }

    /// Counter key: `<prefix>:<identity>:<window index>`.
    pub fn counter_key(&self, identity: &str, window_index: u64) -> String {
        format!("{}:{}:{}", self.scope.prefix(), identity, window_index)
    }

    /// Lifetime set on a fresh counter. Twice the window so a live window is
    /// never dropped before it closes.
    pub fn counter_ttl_seconds(&self) -> u64 {
        self.window_seconds.max(1) * 2
    }
}

/// Outcome of an allowed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub count: u64,
    pub limit: u64,
    /// Seconds until the current window closes.
    pub reset_after: u64,
}

impl RateLimitDecision {
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}

/// Shared atomic counter capability.
///
/// # Implementations
///
/// - [`crate::infrastructure::counter::RedisCounterStore`] - `INCR` / `EXPIRE` across instances
/// - [`crate::infrastructure::counter::MemoryCounterStore`] - single-instance fallback
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments `key` (creating it at 0) and returns the new value.
    async fn increment(&self, key: &str) -> Result<u64, AppError>;

    /// Sets the time-to-live of `key`.
    async fn expire(&self, key: &str, seconds: u64) -> Result<(), AppError>;

    /// Increments `key` and gives it a `ttl_seconds` expiry when this call
    /// created it.
    ///
    /// The default issues [`Self::increment`] then [`Self::expire`], so a
    /// failed `expire` leaves a counter that never expires. Stores able to do
    /// both in one atomic step override it.
    async fn increment_expiring(&self, key: &str, ttl_seconds: u64) -> Result<u64, AppError> {
        let count = self.increment(key).await?;
        if count == 1 {
            self.expire(key, ttl_seconds).await?;
        }
        Ok(count)
    }
}
