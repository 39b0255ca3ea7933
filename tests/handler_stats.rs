mod common;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use common::{ALICE_TOKEN, BOB_TOKEN, bearer};
use serde_json::Value;
use shortlink::domain::repositories::StatsRepository;

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_stats_counts_redirects_today() {
    let mut app = common::spawn_app();
    let link = app
        .links
        .seed("alice", "counted1", "https://example.com", true, None);

    for _ in 0..3 {
        app.server
            .get("/r/counted1")
            .await
            .assert_status(StatusCode::FOUND);
    }
    assert_eq!(app.record_clicks().await, 3);

    let response = app
        .server
        .get(&format!("/api/links/{}/stats", link.id))
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["code"], "counted1");
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"][0]["day"], Utc::now().date_naive().to_string());
    assert_eq!(body["items"][0]["clicks"], 3);
}

#[tokio::test]
async fn test_stats_range_filter() {
    let app = common::spawn_app();
    let link = app
        .links
        .seed("alice", "ranged01", "https://example.com", true, None);

    for d in ["2026-01-01", "2026-01-02", "2026-01-02", "2026-01-05"] {
        app.stats.increment_daily("ranged01", day(d)).await.unwrap();
    }

    let response = app
        .server
        .get(&format!("/api/links/{}/stats", link.id))
        .add_query_param("from", "2026-01-02")
        .add_query_param("to", "2026-01-04")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["day"], "2026-01-02");
}

#[tokio::test]
async fn test_stats_inverted_range() {
    let app = common::spawn_app();
    let link = app
        .links
        .seed("alice", "ranged02", "https://example.com", true, None);

    app.server
        .get(&format!("/api/links/{}/stats", link.id))
        .add_query_param("from", "2026-02-01")
        .add_query_param("to", "2026-01-01")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_stats_of_other_owner_is_forbidden() {
    let app = common::spawn_app();
    let link = app
        .links
        .seed("alice", "private1", "https://example.com", true, None);

    app.server
        .get(&format!("/api/links/{}/stats", link.id))
        .add_header("Authorization", bearer(BOB_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_unknown_link() {
    let app = common::spawn_app();

    app.server
        .get("/api/links/42/stats")
        .add_header("Authorization", bearer(ALICE_TOKEN))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_click_for_unknown_code_is_not_recorded() {
    let app = common::spawn_app();

    let recorded = app
        .stats
        .increment_daily("gone0000", day("2026-01-01"))
        .await
        .unwrap();

    assert!(!recorded);
}
