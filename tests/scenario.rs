mod common;

use axum::http::StatusCode;
use common::{ALICE_TOKEN, bearer};
use serde_json::{Value, json};

/// Create, follow, count, disable, re-enable.
#[tokio::test]
async fn test_link_lifecycle() {
    let mut app = common::spawn_app();

    let created = app
        .server
        .post("/api/links")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "original_url": "https://example.com/docs?page=2" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let created = created.json::<Value>();
    let id = created["id"].as_i64().unwrap();
    let code = created["code"].as_str().unwrap().to_string();
    let redirect_path = format!("/r/{code}");

    // First redirect misses the cache, the second is served from it.
    for _ in 0..2 {
        let response = app.server.get(&redirect_path).await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://example.com/docs?page=2");
    }
    assert!(app.cache.cached(&code).is_some());
    assert_eq!(app.record_clicks().await, 2);

    let stats = app
        .server
        .get(&format!("/api/links/{id}/stats"))
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await
        .json::<Value>();
    assert_eq!(stats["total"], 2);

    app.server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "is_enabled": false }))
        .await
        .assert_status_ok();

    // No stale cache entry may keep the link alive.
    app.server.get(&redirect_path).await.assert_status_not_found();
    assert_eq!(app.record_clicks().await, 0);

    app.server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .json(&json!({ "is_enabled": true }))
        .await
        .assert_status_ok();

    app.server
        .get(&redirect_path)
        .await
        .assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_trailing_path_segments_do_not_match() {
    let app = common::spawn_app();
    app.links
        .seed("alice", "nested01", "https://example.com", true, None);

    app.server
        .get("/r/nested01/extra")
        .await
        .assert_status_not_found();
}
