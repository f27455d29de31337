//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Command intake (by command kind, tasks spawned)
//! - Cache lookups (hits by tier, misses)
//! - Fetches and deliveries (by result)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Command Intake
// =============================================================================

/// Commands received, by kind.
pub static COMMANDS_RECEIVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("albumdrop_commands_total", "Total commands received"),
        &["command"], // "fetch", "search", "status", "rejected"
    )
    .unwrap()
});

/// Orchestration tasks spawned.
pub static TASKS_SPAWNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "albumdrop_tasks_spawned_total",
        "Total per-album orchestration tasks spawned",
    )
    .unwrap()
});

// =============================================================================
// Orchestration
// =============================================================================

/// Cache lookups, by result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("albumdrop_cache_lookups_total", "Total cache lookups"),
        &["result"], // "direct_path", "index", "miss"
    )
    .unwrap()
});

/// Fetch calls, by result.
pub static FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("albumdrop_fetches_total", "Total library fetch calls"),
        &["result"], // "ok", "failed", "error"
    )
    .unwrap()
});

/// Fetch duration in seconds.
pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("albumdrop_fetch_duration_seconds", "Duration of library fetches")
            .buckets(vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0]),
        &["result"],
    )
    .unwrap()
});

/// Artifact deliveries, by result.
pub static DELIVERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("albumdrop_deliveries_total", "Total artifact deliveries"),
        &["result"], // "delivered", "failed"
    )
    .unwrap()
});

/// Orchestration runs, by terminal outcome.
pub static ORCHESTRATION_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "albumdrop_orchestration_outcomes_total",
            "Total orchestration runs by terminal outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Intake
        Box::new(COMMANDS_RECEIVED.clone()),
        Box::new(TASKS_SPAWNED.clone()),
        // Orchestration
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(FETCHES.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(DELIVERIES.clone()),
        Box::new(ORCHESTRATION_OUTCOMES.clone()),
    ]
}
