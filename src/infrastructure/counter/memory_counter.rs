//! In-process counting store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::rate_limit::CounterStore;
use crate::error::AppError;

/// Minimum time between sweeps of expired keys.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Counter {
    count: u64,
    expires_at: Option<Instant>,
}

impl Counter {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug)]
struct Counters {
    entries: HashMap<String, Counter>,
    last_sweep: Instant,
}

impl Counters {
    /// Drops expired keys, at most once per [`SWEEP_INTERVAL`].
    fn sweep(&mut self, now: Instant) {
        if now.saturating_duration_since(self.last_sweep) >= SWEEP_INTERVAL {
            self.entries.retain(|_, c| !c.is_expired(now));
            self.last_sweep = now;
        }
    }

    fn increment(&mut self, key: &str, ttl_seconds: Option<u64>, now: Instant) -> u64 {
        self.sweep(now);

        let counter = self.entries.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: None,
        });
        if counter.is_expired(now) {
            counter.count = 0;
            counter.expires_at = None;
        }
        counter.count += 1;
        if counter.count == 1
            && let Some(ttl) = ttl_seconds
        {
            counter.expires_at = Some(now + Duration::from_secs(ttl));
        }

        counter.count
    }
}

/// Counters kept in a local map.
///
/// Only correct for a single instance; limits are not shared across
/// processes. The lock is held for one map update and never across an await.
#[derive(Debug)]
pub struct MemoryCounterStore {
    counters: Mutex<Counters>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Counters>, AppError> {
        self.counters
            .lock()
            .map_err(|_| AppError::internal("Counter store lock poisoned", json!({})))
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str) -> Result<u64, AppError> {
        Ok(self.lock()?.increment(key, None, Instant::now()))
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), AppError> {
        if let Some(counter) = self.lock()?.entries.get_mut(key) {
            counter.expires_at = Some(Instant::now() + Duration::from_secs(seconds));
        }
        Ok(())
    }

    async fn increment_expiring(&self, key: &str, ttl_seconds: u64) -> Result<u64, AppError> {
        Ok(self.lock()?.increment(key, Some(ttl_seconds), Instant::now()))
    }
}
