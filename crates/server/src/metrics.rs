//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the media-list server:
//! - HTTP request metrics (latency, counts, errors)
//! - Polling status (collected dynamically)
//! - Core metrics (events, poll cycles, storage), registered from the core crate

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "medialist_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("medialist_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Polling Metrics (collected dynamically)
// =============================================================================

/// Polling running state (1 = running, 0 = stopped).
pub static POLLING_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_polling_running",
        "Whether catalog polling is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Current polling interval.
pub static POLLING_INTERVAL_MS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_polling_interval_ms",
        "Configured polling interval in milliseconds",
    )
    .unwrap()
});

/// Current scheduler generation.
pub static POLLING_GENERATION: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_polling_generation",
        "Scheduler generation, bumped every time polling stops",
    )
    .unwrap()
});

// =============================================================================
// Client Metrics (collected dynamically)
// =============================================================================

/// Distinct items in the served client's catalog index.
pub static CATALOG_ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_catalog_items",
        "Number of distinct items in the catalog index",
    )
    .unwrap()
});

/// Entries in the served client's watch list.
pub static WATCH_LIST_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "medialist_watch_list_entries",
        "Number of entries in the watch list",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Polling
    registry
        .register(Box::new(POLLING_RUNNING.clone()))
        .unwrap();
    registry
        .register(Box::new(POLLING_INTERVAL_MS.clone()))
        .unwrap();
    registry
        .register(Box::new(POLLING_GENERATION.clone()))
        .unwrap();

    // Client
    registry
        .register(Box::new(CATALOG_ITEMS.clone()))
        .unwrap();
    registry
        .register(Box::new(WATCH_LIST_ENTRIES.clone()))
        .unwrap();

    // Core metrics (events, polling, catalog, watch list, storage)
    for metric in medialist_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// This is called before encoding metrics to update gauges with the current
/// scheduler status and the served client's catalog and watch list sizes.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let app = state.app();
    let status = app.scheduler().status();
    POLLING_RUNNING.set(if status.running { 1 } else { 0 });
    POLLING_INTERVAL_MS.set(status.interval_ms as i64);
    POLLING_GENERATION.set(status.generation as i64);
    CATALOG_ITEMS.set(app.catalog().len() as i64);
    WATCH_LIST_ENTRIES.set(app.watch_list().len() as i64);
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
///
/// Only watch list routes carry an id, and ids may be arbitrary strings, so
/// any segment after `/watchlist/` is replaced as well.
pub fn normalize_path(path: &str) -> String {
    if let Some((prefix, rest)) = path.split_once("/watchlist/") {
        if !rest.is_empty() {
            return format!("{}/watchlist/{{id}}", prefix);
        }
    }
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}
