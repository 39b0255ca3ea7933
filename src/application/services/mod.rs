//! Business logic services for the application layer.

pub mod auth_service;
pub mod cache_invalidator;
pub mod code_allocator;
pub mod link_service;
pub mod rate_limiter;
pub mod redirect_resolver;
pub mod stats_service;

pub use auth_service::{AuthService, hash_token};
pub use cache_invalidator::CacheInvalidator;
pub use code_allocator::CodeAllocator;
pub use link_service::LinkService;
pub use rate_limiter::RateLimiter;
pub use redirect_resolver::RedirectResolver;
pub use stats_service::StatsService;
