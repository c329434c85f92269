// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for graph builds.
//!
//! All metrics carry the `gateway_graph_` prefix.
//!
//! # Metrics
//!
//! - `gateway_graph_builds_total` - graph builds run
//! - `gateway_graph_build_duration_seconds` - time spent per build
//! - `gateway_graph_resources_total{kind, outcome}` - processed resources by outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use gateway_graph::metrics::{gather_metrics, record_resource};
//!
//! record_resource("BackendTLSPolicy", "valid");
//! println!("{}", gather_metrics().unwrap());
//! ```

use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics
const METRICS_NAMESPACE: &str = "gateway_graph";

/// Outcome label for a valid resource
pub const OUTCOME_VALID: &str = "valid";

/// Outcome label for a rejected resource
pub const OUTCOME_INVALID: &str = "invalid";

/// Outcome label for a policy ignored because its ancestor list is full
pub const OUTCOME_IGNORED: &str = "ignored";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Graph Metrics
// ============================================================================

/// Total number of graph builds
pub static GRAPH_BUILDS_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::with_opts(Opts::new(
        format!("{METRICS_NAMESPACE}_builds_total"),
        "Total number of graph builds",
    ))
    .expect("graph builds counter is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("graph builds counter registers once");
    counter
});

/// Duration of graph builds in seconds
pub static GRAPH_BUILD_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_build_duration_seconds"),
        "Duration of graph builds in seconds",
    )
    .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]);
    let histogram = Histogram::with_opts(opts).expect("graph build histogram is valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("graph build histogram registers once");
    histogram
});

/// Total number of processed resources
///
/// Labels:
/// - `kind`: Kind of resource (e.g., `Listener`, `BackendTLSPolicy`)
/// - `outcome`: `valid`, `invalid` or `ignored`
pub static RESOURCES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_resources_total"),
        "Total number of processed resources by kind and outcome",
    );
    let counter =
        CounterVec::new(opts, &["kind", "outcome"]).expect("resources counter is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("resources counter registers once");
    counter
});

/// Record a completed graph build
///
/// # Arguments
/// * `duration` - Time spent building the graph
pub fn record_graph_build(duration: Duration) {
    GRAPH_BUILDS_TOTAL.inc();
    GRAPH_BUILD_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record one processed resource
///
/// # Arguments
/// * `kind` - The kind of resource processed
/// * `outcome` - One of [`OUTCOME_VALID`], [`OUTCOME_INVALID`], [`OUTCOME_IGNORED`]
pub fn record_resource(kind: &str, outcome: &str) {
    RESOURCES_TOTAL.with_label_values(&[kind, outcome]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
