//! Repository trait definitions for the domain layer.
//!
//! These traits are the external store capabilities the core consumes. The
//! infrastructure layer provides PostgreSQL implementations; unit tests use the
//! `mockall` mocks generated under `cfg(test)`.
//!
//! - [`LinkRepository`] - Durable link store
//! - [`TokenRepository`] - API tokens backing the identity provider
//! - [`StatsRepository`] - Daily click counters

pub mod link_repository;
pub mod stats_repository;
pub mod token_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;
pub use token_repository::{ApiToken, NewApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
