//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Event bus traffic
//! - Polling (cycles, fetch latency)
//! - Watch list pruning
//! - Storage failures
//!
//! Everything here is process-wide and aggregates over every client in the
//! process. Per-client sizes are read from the client itself at scrape time.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Event Bus
// =============================================================================

/// Events published, by event name.
pub static EVENTS_PUBLISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("medialist_events_published_total", "Total events published"),
        &["event"],
    )
    .unwrap()
});

// =============================================================================
// Polling
// =============================================================================

/// Poll cycles by outcome.
pub static POLL_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("medialist_poll_cycles_total", "Total poll cycles completed"),
        &["result"], // "success", "failure", "stale"
    )
    .unwrap()
});

/// Catalog fetch duration in seconds.
pub static FETCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "medialist_fetch_duration_seconds",
            "Duration of catalog fetches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

// =============================================================================
// Watch list
// =============================================================================

/// Watch entries dropped by reconciliation.
pub static WATCH_LIST_PRUNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "medialist_watch_list_pruned_total",
        "Watch list entries pruned because they left the catalog",
    )
    .unwrap()
});

// =============================================================================
// Storage
// =============================================================================

/// Failed storage operations, by operation.
pub static STORAGE_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("medialist_storage_errors_total", "Total storage failures"),
        &["op"], // "get", "put", "delete"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(EVENTS_PUBLISHED.clone()),
        Box::new(POLL_CYCLES.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(WATCH_LIST_PRUNED.clone()),
        Box::new(STORAGE_ERRORS.clone()),
    ]
}
