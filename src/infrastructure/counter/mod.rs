//! Counting stores backing the rate limiter.
//!
//! - [`RedisCounterStore`] - Shared across instances via `INCR` / `EXPIRE`
//! - [`MemoryCounterStore`] - Process-local fallback when Redis is not configured

mod memory_counter;
mod redis_counter;

pub use memory_counter::MemoryCounterStore;
pub use redis_counter::RedisCounterStore;
