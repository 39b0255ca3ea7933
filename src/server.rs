//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, Redis setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::rate_limit::CounterStore;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache, connect_manager};
use crate::infrastructure::counter::{MemoryCounterStore, RedisCounterStore};
use crate::infrastructure::persistence::{PgLinkRepository, PgStatsRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::{AppState, Settings, Stores};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache and rate counters (in-process fallbacks only when Redis is not configured)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Redis is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let (cache, counters) = connect_redis(config.redis_url.as_deref()).await?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let pool = Arc::new(pool);
    let stats_repository = Arc::new(PgStatsRepository::new(pool.clone()));
    let worker = tokio::spawn(run_click_worker(click_rx, stats_repository.clone()));
    tracing::info!("Click worker started");

    let stores = Stores {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        stats: stats_repository,
        tokens: Arc::new(PgTokenRepository::new(pool.clone())),
        cache,
        counters,
    };
    let state = AppState::new(stores, Settings::from(&config), click_tx);

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and every click sender) is dropped once serve returns, so the
    // worker drains the queue and exits.
    if let Err(e) = worker.await {
        tracing::warn!("Click worker ended abnormally: {}", e);
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Redirect cache and rate-limit counters, built together.
type RedisStores = (Arc<dyn CacheService>, Arc<dyn CounterStore>);

/// Builds the cache and the rate-limit counter store.
///
/// Both share one Redis connection. Without Redis the cache is disabled and
/// counters are kept per process, so limits are not shared across instances.
///
/// # Errors
///
/// Fails when Redis is configured but unreachable. Falling back to
/// per-process counters would multiply every limit by the instance count.
async fn connect_redis(redis_url: Option<&str>) -> Result<RedisStores> {
    let Some(redis_url) = redis_url else {
        tracing::info!("Redis not configured: cache disabled, rate limits per instance");
        return Ok((Arc::new(NullCache), Arc::new(MemoryCounterStore::new())));
    };

    let manager = connect_manager(redis_url)
        .await
        .context("REDIS_URL is set but Redis is unreachable")?;
    tracing::info!("Cache and rate limiting backed by Redis");

    Ok((
        Arc::new(RedisCache::new(manager.clone())),
        Arc::new(RedisCounterStore::new(manager)),
    ))
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
