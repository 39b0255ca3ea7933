//! Fixed-window request limiting over a shared counter store.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::rate_limit::{CounterStore, RateLimitDecision, RateLimitPolicy};
use crate::error::AppError;

/// Counts requests per `(scope, identity, window)` and rejects once a window's
/// count exceeds the policy limit.
///
/// Windows are aligned to the epoch, so a client can send up to twice the
/// limit across a window boundary.
pub struct RateLimiter<S: CounterStore + ?Sized> {
    store: Arc<S>,
}

impl<S: CounterStore + ?Sized> RateLimiter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Checks and counts one request at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// See [`Self::check_at`].
    pub async fn check(
        &self,
        policy: &RateLimitPolicy,
        identity: &str,
    ) -> Result<RateLimitDecision, AppError> {
        let now_secs = u64::try_from(Utc::now().timestamp()).unwrap_or_default();

        self.check_at(policy, identity, now_secs).await
    }

    /// Checks and counts one request at `now_secs` (seconds since the epoch).
    ///
    /// Rejected requests are still counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] when the count exceeds the limit.
    /// Returns the store's error if the counter cannot be updated; requests
    /// are not admitted without a count.
    pub async fn check_at(
        &self,
        policy: &RateLimitPolicy,
        identity: &str,
        now_secs: u64,
    ) -> Result<RateLimitDecision, AppError> {
        let window = policy.window_seconds.max(1);
        let key = policy.counter_key(identity, policy.window_index(now_secs));

        let count = self
            .store
            .increment_expiring(&key, policy.counter_ttl_seconds())
            .await?;

        let decision = RateLimitDecision {
            count,
            limit: policy.limit,
            reset_after: window - now_secs % window,
        };

        if count > policy.limit {
            metrics::counter!("shortlink_rate_limited_total", "scope" => policy.scope.prefix())
                .increment(1);
            warn!(scope = %policy.scope, identity, count, "Rate limit exceeded");
            return Err(AppError::rate_limited(
                "Too many requests",
                json!({
                    "limit": policy.limit,
                    "window_seconds": policy.window_seconds,
                    "retry_after": decision.reset_after,
                }),
            ));
        }

        debug!(scope = %policy.scope, identity, count, "Rate limit check passed");
        Ok(decision)
    }
}
