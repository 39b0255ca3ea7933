#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

use shortlink::application::services::hash_token;
use shortlink::domain::click_event::ClickEvent;
use shortlink::domain::entities::{DailyClicks, Link, LinkPatch, NewLink};
use shortlink::domain::rate_limit::{CounterStore, RateLimitPolicy, RateScope};
use shortlink::domain::repositories::{
    ApiToken, LinkRepository, NewApiToken, StatsRepository, TokenRepository,
};
use shortlink::error::AppError;
use shortlink::infrastructure::cache::{CacheError, CacheResult, CacheService};
use shortlink::infrastructure::counter::MemoryCounterStore;
use shortlink::routes::app_router;
use shortlink::state::{AppState, Settings, Stores};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://sho.rt";

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const REVOKED_TOKEN: &str = "revoked-token";

// ─── In-memory stores ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
}

impl InMemoryLinkRepository {
    /// Stores a link directly, bypassing allocation.
    pub fn seed(
        &self,
        owner: &str,
        code: &str,
        url: &str,
        is_enabled: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Link {
        let mut links = self.links.lock().unwrap();
        let link = Link::new(
            links.len() as i64 + 1,
            owner.to_string(),
            code.to_string(),
            url.to_string(),
            is_enabled,
            expires_at,
            Utc::now(),
        );
        links.push(link.clone());
        link
    }

    pub fn get(&self, id: i64) -> Option<Link> {
        self.links.lock().unwrap().iter().find(|l| l.id == id).cloned()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.get(id))
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "field": "code" }),
            ));
        }

        let link = Link::new(
            links.len() as i64 + 1,
            new_link.owner_id,
            new_link.code,
            new_link.original_url,
            true,
            new_link.expires_at,
            Utc::now(),
        );
        links.push(link.clone());
        Ok(link)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        let link = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        patch.apply(link);
        Ok(link.clone())
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<Link>, AppError> {
        let offset = ((page - 1) * page_size) as usize;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| l.owner_id == owner_id)
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn count_by_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .count() as i64)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub struct InMemoryStatsRepository {
    links: Arc<InMemoryLinkRepository>,
    counters: Mutex<BTreeMap<(i64, NaiveDate), i64>>,
}

impl InMemoryStatsRepository {
    pub fn new(links: Arc<InMemoryLinkRepository>) -> Self {
        Self {
            links,
            counters: Mutex::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn increment_daily(&self, code: &str, day: NaiveDate) -> Result<bool, AppError> {
        let Some(link) = self.links.find_by_code(code).await? else {
            return Ok(false);
        };
        *self
            .counters
            .lock()
            .unwrap()
            .entry((link.id, day))
            .or_insert(0) += 1;
        Ok(true)
    }

    async fn daily_clicks(
        &self,
        link_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyClicks>, AppError> {
        Ok(self
            .counters
            .lock()
            .unwrap()
            .range((link_id, from)..=(link_id, to))
            .map(|(&(_, day), &clicks)| DailyClicks::new(day, clicks))
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    /// Issues `raw` for `owner`, hashed the way the admin CLI does.
    pub fn issue(&self, raw: &str, owner: &str, is_admin: bool) -> ApiToken {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: format!("{owner}-{raw}"),
            owner_id: owner.to_string(),
            is_admin,
            token_hash: hash_token(SIGNING_SECRET, raw).unwrap(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        token
    }

    pub fn last_used(&self, raw: &str) -> Option<DateTime<Utc>> {
        let hash = hash_token(SIGNING_SECRET, raw).unwrap();
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == hash)
            .and_then(|t| t.last_used_at)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .cloned())
    }

    async fn touch(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(t) = self
            .tokens
            .lock()
            .unwrap()
            .iter_mut()
            .find(|t| t.token_hash == token_hash)
        {
            t.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, new_token: NewApiToken) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: new_token.name,
            owner_id: new_token.owner_id,
            is_admin: new_token.is_admin,
            token_hash: new_token.token_hash,
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        if let Some(t) = self.tokens.lock().unwrap().iter_mut().find(|t| t.id == id) {
            t.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// Redirect cache backed by a map. Can be switched off to simulate an outage.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl InMemoryCache {
    pub fn cached(&self, code: &str) -> Option<String> {
        self.entries.lock().unwrap().get(code).cloned()
    }

    pub fn put(&self, code: &str, url: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), url.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> CacheResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.cached(short_code))
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        _ttl_seconds: u64,
    ) -> CacheResult<()> {
        self.check()?;
        self.put(short_code, original_url);
        Ok(())
    }

    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(short_code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }
}

// ─── Peer address ────────────────────────────────────────────────────────────

/// Inserts a fixed `ConnectInfo`, standing in for the real socket listener.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

// ─── Test application ────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinkRepository>,
    pub stats: Arc<InMemoryStatsRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
    pub cache: Arc<InMemoryCache>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

impl TestApp {
    /// Drains queued click events into the stats store, as the worker would.
    pub async fn record_clicks(&mut self) -> usize {
        let mut recorded = 0;
        while let Ok(event) = self.clicks.try_recv() {
            if self.stats.increment_daily(&event.code, event.day()).await.unwrap() {
                recorded += 1;
            }
        }
        recorded
    }
}

/// Limits high enough that tests not about rate limiting never hit them.
pub fn test_settings() -> Settings {
    Settings {
        base_url: BASE_URL.to_string(),
        cache_redirect_ttl: 60,
        token_signing_secret: SIGNING_SECRET.to_string(),
        behind_proxy: true,
        redirect_limit: RateLimitPolicy::new(RateScope::Ip, 10_000, 3600),
        create_link_limit: RateLimitPolicy::new(RateScope::User, 10_000, 3600),
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_settings())
}

pub fn spawn_app_with(settings: Settings) -> TestApp {
    spawn_app_with_counters(settings, Arc::new(MemoryCounterStore::new()))
}

/// Builds an app on a caller-provided counter store, so several apps can
/// share rate-limit state the way instances share Redis.
pub fn spawn_app_with_counters(settings: Settings, counters: Arc<dyn CounterStore>) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::default());
    let stats = Arc::new(InMemoryStatsRepository::new(links.clone()));
    let tokens = Arc::new(InMemoryTokenRepository::default());
    let cache = Arc::new(InMemoryCache::default());

    tokens.issue(ALICE_TOKEN, "alice", false);
    tokens.issue(BOB_TOKEN, "bob", false);
    tokens.issue(ADMIN_TOKEN, "root", true);
    let revoked = tokens.issue(REVOKED_TOKEN, "mallory", false);
    tokens
        .tokens
        .lock()
        .unwrap()
        .iter_mut()
        .filter(|t| t.id == revoked.id)
        .for_each(|t| t.revoked_at = Some(Utc::now()));

    let stores = Stores {
        links: links.clone(),
        stats: stats.clone(),
        tokens: tokens.clone(),
        cache: cache.clone(),
        counters,
    };

    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(stores, settings, tx);
    let app = app_router(state).layer(MockConnectInfoLayer);

    TestApp {
        server: TestServer::new(app).unwrap(),
        links,
        stats,
        tokens,
        cache,
        clicks: rx,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
