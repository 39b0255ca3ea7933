//! Application layer services implementing business logic.
//!
//! Services consume repository and store traits and are generic over them, so
//! HTTP handlers and tests can plug in any implementation.
//!
//! # Available Services
//!
//! - [`services::code_allocator::CodeAllocator`] - Unique short code allocation
//! - [`services::redirect_resolver::RedirectResolver`] - Cache-aside code resolution
//! - [`services::cache_invalidator::CacheInvalidator`] - Stale redirect removal
//! - [`services::rate_limiter::RateLimiter`] - Fixed-window request limiting
//! - [`services::link_service::LinkService`] - Link creation, ownership checks and updates
//! - [`services::stats_service::StatsService`] - Daily click statistics
//! - [`services::auth_service::AuthService`] - Bearer token identity

pub mod services;
