// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the federated ingress DNS controller.
//!
//! Every metric carries the `federated_ingress_dns_` prefix.
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - outcome and duration of each dequeued ingress
//! - **Provider Metrics** - changesets applied per hierarchy level
//! - **Error Metrics** - failures by reason
//!
//! # Example
//!
//! ```rust,no_run
//! use federated_ingress_dns::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success(std::time::Duration::from_millis(20));
//! ```

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info};

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics
const METRICS_NAMESPACE: &str = "federated_ingress_dns";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via the `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciled ingresses by status
///
/// Labels:
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of ingress reconciliations by status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of reconciliations in seconds
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of ingress reconciliations in seconds",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = Histogram::with_opts(opts).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of dequeued ingresses skipped because they report no local
/// load balancer endpoint
pub static SKIPPED_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let counter = Counter::new(
        format!("{METRICS_NAMESPACE}_skipped_total"),
        "Total number of ingresses skipped for lack of a local load balancer endpoint",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Provider Metrics
// ============================================================================

/// Total number of changesets applied to the DNS provider
///
/// Labels:
/// - `level`: Hierarchy level (`zone`, `region`, `global`)
pub static CHANGESETS_APPLIED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_changesets_applied_total"),
        "Total number of DNS provider changesets applied by hierarchy level",
    );
    let counter = CounterVec::new(opts, &["level"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of errors by reason
///
/// Labels:
/// - `reason`: Stable reason code (e.g., `TopologyLookupFailed`)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Record a successful reconciliation
pub fn record_reconciliation_success(duration: Duration) {
    RECONCILIATION_TOTAL.with_label_values(&["success"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed reconciliation
///
/// # Arguments
/// * `reason` - Stable reason code of the failure
/// * `duration` - Duration of the reconciliation before failure
pub fn record_reconciliation_error(reason: &str, duration: Duration) {
    RECONCILIATION_TOTAL.with_label_values(&["error"]).inc();
    RECONCILIATION_DURATION_SECONDS.observe(duration.as_secs_f64());
    record_error(reason);
}

/// Record an ingress skipped by the worker gate
pub fn record_skipped() {
    SKIPPED_TOTAL.inc();
}

/// Record a changeset applied at a hierarchy level
pub fn record_changeset_applied(level: &str) {
    CHANGESETS_APPLIED_TOTAL.with_label_values(&[level]).inc();
}

/// Record an error
pub fn record_error(reason: &str) {
    ERRORS_TOTAL.with_label_values(&[reason]).inc();
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

pub(crate) async fn metrics_handler() -> impl IntoResponse {
    match gather_metrics() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Router exposing `GET /metrics`
pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve `/metrics` on `addr` until the process exits.
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails
pub async fn serve_metrics(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Serving metrics");
    axum::serve(listener, router()).await
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
