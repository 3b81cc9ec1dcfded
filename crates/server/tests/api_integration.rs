//! HTTP API integration tests.
//!
//! Drive the router in-process against a real client with mocked
//! catalog source and key/value store.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{titles, TestFixture};
use medialist_core::FetchError;

// =============================================================================
// Health / config / metrics
// =============================================================================

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["api"]["token_configured"], true);
    assert!(response.body["api"].get("token").is_none());
    assert_eq!(response.body["polling"]["interval_ms"], 60_000);
    assert_eq!(response.body["storage"]["prefix"], "mla_");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    fixture.get("/api/v1/health").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("medialist_http_requests_total"));
    assert!(body.contains("medialist_polling_running"));
}

// =============================================================================
// Media
// =============================================================================

#[tokio::test]
async fn test_media_empty_before_first_poll() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/media").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 0);
    assert_eq!(response.body["sort"]["by"], "title");
    assert_eq!(response.body["sort"]["dir"], 1);
    assert_eq!(response.body["filter"], "*");
}

#[tokio::test]
async fn test_media_sorted_by_title_after_poll() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    let response = fixture.get("/api/v1/media").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["total"], 6);
    assert_eq!(response.body["known"], 6);
    assert_eq!(
        titles(&response.body),
        vec![
            "Ambient Radio",
            "Bird Watching",
            "Cooking Basics",
            "Late Night Talk",
            "Morning Show",
            "Travel Diaries",
        ]
    );
}

#[tokio::test]
async fn test_update_filter() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    let response = fixture
        .put("/api/v1/media/filter", json!({ "filter": "live" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["filter"], "live");
    assert_eq!(titles(&response.body), vec!["Ambient Radio", "Morning Show"]);

    let response = fixture
        .put("/api/v1/media/filter", json!({ "filter": "offline" }))
        .await;
    assert_eq!(response.body["total"], 4);
}

#[tokio::test]
async fn test_unknown_filter_shows_everything() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    let response = fixture
        .put("/api/v1/media/filter", json!({ "filter": "podcasts" }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["filter"], "*");
    assert_eq!(response.body["total"], 6);
}

#[tokio::test]
async fn test_update_sort() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;
    fixture
        .put("/api/v1/media/filter", json!({ "filter": "video" }))
        .await;

    let response = fixture
        .put("/api/v1/media/sort", json!({ "by": "title", "dir": -1 }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["sort"]["dir"], -1);
    assert_eq!(
        titles(&response.body),
        vec!["Travel Diaries", "Cooking Basics", "Bird Watching"]
    );

    // Sorting by id keeps the direction
    let response = fixture
        .put("/api/v1/media/sort", json!({ "by": "id" }))
        .await;
    assert_eq!(
        titles(&response.body),
        vec!["Bird Watching", "Travel Diaries", "Cooking Basics"]
    );
}

#[tokio::test]
async fn test_invalid_sort_direction_is_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .put("/api/v1/media/sort", json!({ "by": "id", "dir": 2 }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("2"));

    // Nothing changed
    let response = fixture.get("/api/v1/media").await;
    assert_eq!(response.body["sort"]["by"], "title");
}

#[tokio::test]
async fn test_empty_sort_field_is_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .put("/api/v1/media/sort", json!({ "by": "  " }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Watch list
// =============================================================================

#[tokio::test]
async fn test_watch_list_add_and_view() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    let response = fixture
        .post("/api/v1/watchlist", json!({ "mediaId": 4 }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(titles(&response.body), vec!["Travel Diaries"]);
    assert_eq!(response.body["entries"][0]["mediaId"], 4);
    assert!(response.body["items"][0]["addedAt"].is_string());

    // String ids address the same item
    let response = fixture
        .post("/api/v1/watchlist", json!({ "media_id": "1" }))
        .await;
    assert_status!(response, StatusCode::CREATED);
    assert_eq!(titles(&response.body), vec!["Travel Diaries", "Morning Show"]);

    assert!(fixture.store.raw("mla_watch_later_items").is_some());
}

#[tokio::test]
async fn test_watch_list_hides_unknown_items() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    fixture
        .post("/api/v1/watchlist", json!({ "mediaId": 999 }))
        .await;

    let response = fixture.get("/api/v1/watchlist").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["entries"].as_array().unwrap().len(), 1);

    // Next poll prunes it
    fixture.poll_once().await;
    let response = fixture.get("/api/v1/watchlist").await;
    assert_eq!(response.body["entries"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_watch_list_remove() {
    let fixture = TestFixture::new().await;
    fixture.poll_once().await;

    for id in [2, 3, 2] {
        fixture
            .post("/api/v1/watchlist", json!({ "mediaId": id }))
            .await;
    }

    let response = fixture.delete("/api/v1/watchlist/2").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(titles(&response.body), vec!["Ambient Radio"]);

    // Removing something that is not there is fine
    let response = fixture.delete("/api/v1/watchlist/2").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_watch_list_storage_unavailable() {
    let fixture = TestFixture::new().await;
    fixture.store.set_unavailable(true);

    let response = fixture
        .post("/api/v1/watchlist", json!({ "mediaId": 1 }))
        .await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("unavailable"));

    let response = fixture.delete("/api/v1/watchlist/1").await;
    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_watch_list_add_requires_media_id() {
    let fixture = TestFixture::new().await;
    let response = fixture.post("/api/v1/watchlist", json!({})).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Polling
// =============================================================================

#[tokio::test]
async fn test_polling_status_initially_idle() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/polling").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], false);
    assert_eq!(response.body["interval_ms"], 60_000);
    assert_eq!(response.body["generation"], 0);
}

#[tokio::test]
async fn test_update_interval_restarts_polling() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .put("/api/v1/polling/interval", json!({ "seconds": 30 }))
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], true);
    assert_eq!(response.body["interval_ms"], 30_000);

    medialist_core::testing::settle().await;
    assert_eq!(fixture.source.fetch_count().await, 1);

    let response = fixture.post_empty("/api/v1/polling/stop").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], false);
    assert_eq!(response.body["generation"], 1);
}

#[tokio::test]
async fn test_update_interval_rejects_zero() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .put("/api/v1/polling/interval", json!({ "seconds": 0 }))
        .await;
    assert_status!(response, StatusCode::BAD_REQUEST);

    let response = fixture.get("/api/v1/polling").await;
    assert_eq!(response.body["interval_ms"], 60_000);
    assert_eq!(response.body["running"], false);
}

#[tokio::test]
async fn test_restart_recovers_from_fetch_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .source
        .set_next_error(FetchError::ApiError {
            status: 502,
            message: "Bad Gateway".to_string(),
        })
        .await;

    fixture.app.start();
    medialist_core::testing::settle().await;

    let response = fixture.get("/api/v1/polling").await;
    assert_eq!(response.body["running"], false);
    assert!(response.body["last_error"]
        .as_str()
        .unwrap()
        .contains("502"));

    let response = fixture.post_empty("/api/v1/polling/restart").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["running"], true);
    assert!(response.body.get("last_error").is_none());

    medialist_core::testing::settle().await;
    let response = fixture.get("/api/v1/media").await;
    assert_eq!(response.body["total"], 6);

    fixture.post_empty("/api/v1/polling/stop").await;
}
