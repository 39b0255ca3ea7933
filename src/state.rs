//! Shared application state handed to every handler and middleware.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    AuthService, LinkService, RateLimiter, RedirectResolver, StatsService,
};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::rate_limit::{CounterStore, RateLimitPolicy};
use crate::domain::repositories::{LinkRepository, StatsRepository, TokenRepository};
use crate::infrastructure::cache::CacheService;

/// Backing stores the services are built on.
///
/// Production wires PostgreSQL and Redis implementations; integration tests
/// plug in in-memory ones.
#[derive(Clone)]
pub struct Stores {
    pub links: Arc<dyn LinkRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub cache: Arc<dyn CacheService>,
    pub counters: Arc<dyn CounterStore>,
}

/// Values derived from [`Config`] that shape request handling.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub cache_redirect_ttl: u64,
    pub token_signing_secret: String,
    pub behind_proxy: bool,
    pub redirect_limit: RateLimitPolicy,
    pub create_link_limit: RateLimitPolicy,
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            cache_redirect_ttl: config.cache_redirect_ttl,
            token_signing_secret: config.token_signing_secret.clone(),
            behind_proxy: config.behind_proxy,
            redirect_limit: config.redirect_policy(),
            create_link_limit: config.create_link_policy(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository, dyn CacheService>>,
    pub redirect_resolver: Arc<RedirectResolver<dyn LinkRepository, dyn CacheService>>,
    pub stats_service: Arc<StatsService<dyn StatsRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    pub rate_limiter: Arc<RateLimiter<dyn CounterStore>>,
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(stores: Stores, settings: Settings, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        let link_service = LinkService::new(
            stores.links.clone(),
            stores.cache.clone(),
            settings.base_url.clone(),
        );
        let redirect_resolver = RedirectResolver::new(
            stores.links.clone(),
            stores.cache.clone(),
            settings.cache_redirect_ttl,
        );
        let auth_service =
            AuthService::new(stores.tokens.clone(), settings.token_signing_secret.clone());

        Self {
            link_service: Arc::new(link_service),
            redirect_resolver: Arc::new(redirect_resolver),
            stats_service: Arc::new(StatsService::new(stores.stats)),
            auth_service: Arc::new(auth_service),
            rate_limiter: Arc::new(RateLimiter::new(stores.counters)),
            links: stores.links,
            cache: stores.cache,
            click_sender,
            settings: Arc::new(settings),
        }
    }
}
