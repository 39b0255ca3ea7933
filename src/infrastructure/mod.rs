//! Infrastructure layer for external stores.
//!
//! Implements the capabilities the domain layer defines.
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`counter`] - Rate-limit counting stores (Redis and in-memory)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod counter;
pub mod persistence;
