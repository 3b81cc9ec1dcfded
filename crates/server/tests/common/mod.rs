//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! backed by a real `MediaListApp` with mock collaborators injected, so the
//! full HTTP surface can be exercised without a catalog server or a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use medialist_core::{
    testing::{settle, MockKeyValueStore, MockMediaSource},
    Config, KeyValueStore, MediaListApp, MediaSource,
};

/// Re-export fixtures for test convenience
pub use medialist_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Catalog fetches (MockMediaSource)
/// - Watch list persistence (MockKeyValueStore)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_to_watch_list() {
///     let fixture = TestFixture::new().await;
///     fixture.poll_once().await;
///
///     let response = fixture.post("/api/v1/watchlist", json!({ "mediaId": 2 })).await;
///     assert_eq!(response.status, StatusCode::CREATED);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The client behind the router
    pub app: Arc<MediaListApp>,
    /// Mock catalog source - configure items and failures
    pub source: Arc<MockMediaSource>,
    /// Mock key/value store - inspect or break persistence
    pub store: Arc<MockKeyValueStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture serving the mixed fixture catalog.
    pub async fn new() -> Self {
        Self::with_catalog(fixtures::mixed_catalog()).await
    }

    /// Create a test fixture with a custom catalog.
    pub async fn with_catalog(items: Vec<medialist_core::MediaItem>) -> Self {
        let mut config = Config::default();
        config.api.token = Some("test-token".to_string());
        config.polling.interval_ms = 60_000;
        config.polling.autostart = false;
        config.server.port = 0; // Not used for in-process testing

        let source = Arc::new(MockMediaSource::with_catalog(items));
        let store = Arc::new(MockKeyValueStore::new());

        let app = Arc::new(MediaListApp::from_config(
            &config,
            Arc::clone(&source) as Arc<dyn MediaSource>,
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
        ));
        app.activate();

        let state = Arc::new(medialist_server::state::AppState::new(
            config,
            Arc::clone(&app),
        ));
        let router = medialist_server::api::create_router(state);

        Self {
            router,
            app,
            source,
            store,
        }
    }

    /// Run exactly one poll cycle and leave polling stopped.
    pub async fn poll_once(&self) {
        self.app.start();
        settle().await;
        self.app.stop();
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Titles of the items in a list response, in order.
pub fn titles(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["title"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
