mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "redirect", "https://example.com/target", true, None);

    let response = app.server.get("/r/redirect").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_fills_cache_on_miss() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "fillCach", "https://example.com/a", true, None);

    assert!(app.cache.cached("fillCach").is_none());

    app.server
        .get("/r/fillCach")
        .await
        .assert_status(StatusCode::FOUND);

    assert_eq!(
        app.cache.cached("fillCach").as_deref(),
        Some("https://example.com/a")
    );
}

#[tokio::test]
async fn test_redirect_served_from_cache() {
    let app = common::spawn_app();
    // Entry exists only in the cache: a hit must not need the store.
    app.cache.put("onlyCach", "https://cached.example.com");

    let response = app.server.get("/r/onlyCach").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://cached.example.com");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app();

    let response = app.server.get("/r/missing1").await;

    response.assert_status_not_found();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_disabled_and_expired_look_like_missing() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "disabled", "https://example.com", false, None);
    app.links.seed(
        "alice",
        "expired1",
        "https://example.com",
        true,
        Some(Utc::now() - Duration::hours(1)),
    );

    let missing = app.server.get("/r/missing1").await;
    let disabled = app.server.get("/r/disabled").await;
    let expired = app.server.get("/r/expired1").await;

    for response in [&missing, &disabled, &expired] {
        response.assert_status_not_found();
    }
    let missing_body = missing.json::<serde_json::Value>();
    assert_eq!(disabled.json::<serde_json::Value>(), missing_body);
    assert_eq!(expired.json::<serde_json::Value>(), missing_body);

    assert!(app.cache.cached("disabled").is_none());
    assert!(app.cache.cached("expired1").is_none());
}

#[tokio::test]
async fn test_redirect_malformed_code() {
    let app = common::spawn_app();

    app.server.get("/r/short").await.assert_status_not_found();
    app.server
        .get("/r/has-dash1")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_cache_outage_is_unavailable() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "cacheOut", "https://example.com", true, None);
    app.cache.set_unavailable(true);

    let response = app.server.get("/r/cacheOut").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "store_unavailable");
}

#[tokio::test]
async fn test_redirect_queues_click() {
    let mut app = common::spawn_app();
    app.links
        .seed("alice", "clickMe1", "https://example.com", true, None);

    app.server
        .get("/r/clickMe1")
        .await
        .assert_status(StatusCode::FOUND);

    let event = app.clicks.try_recv().unwrap();
    assert_eq!(event.code, "clickMe1");
}

#[tokio::test]
async fn test_not_found_does_not_queue_click() {
    let mut app = common::spawn_app();

    app.server.get("/r/missing1").await.assert_status_not_found();

    assert!(app.clicks.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_carries_rate_limit_headers() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "headers1", "https://example.com", true, None);

    let response = app.server.get("/r/headers1").await;

    assert_eq!(response.header("x-ratelimit-limit"), "10000");
    assert_eq!(response.header("x-ratelimit-remaining"), "9999");
}
