//! Prometheus Metrics Definitions
//!
//! Defines the service metrics with their labels and exposes a /metrics
//! endpoint for Prometheus scraping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use once_cell::sync::{Lazy, OnceCell};
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Store operation latency buckets (seconds). Every operation pays for a
/// fresh connection, so the tail is longer than a pooled client's.
const STORE_LATENCY_BUCKETS: &[f64] =
    &[0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance - initialized once at first use
pub static METRICS: Lazy<ApiResult<MeetupMetrics>> = Lazy::new(MeetupMetrics::new);

static METRICS_ENABLED: OnceCell<bool> = OnceCell::new();

/// Fix whether metrics are collected and exposed for this process.
///
/// Only the first call takes effect; returns false if the switch was already
/// set. Until then metrics are on.
pub fn set_metrics_enabled(enabled: bool) -> bool {
    METRICS_ENABLED.set(enabled).is_ok()
}

/// Whether metrics are collected and `/metrics` is served.
pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.get().copied().unwrap_or(true)
}

/// Container for all service metrics.
#[derive(Clone)]
pub struct MeetupMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Store operation counter - labels: operation, backend, status
    pub store_operations_total: CounterVec,

    /// Store operation duration histogram - labels: operation, backend
    pub store_operation_duration_seconds: HistogramVec,

    /// Page serve counter - labels: page, cache
    pub page_serves_total: CounterVec,

    /// Number of cached detail pages
    pub detail_pages_cached: Gauge,
}

impl MeetupMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "meetup_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "meetup_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            store_operations_total: register_counter_vec!(
                "meetup_store_operations_total",
                "Total number of record store operations",
                &["operation", "backend", "status"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register store_operations_total: {}", e)))?,

            store_operation_duration_seconds: register_histogram_vec!(
                "meetup_store_operation_duration_seconds",
                "Record store operation duration in seconds, connection included",
                &["operation", "backend"],
                STORE_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register store_operation_duration_seconds: {}", e)))?,

            page_serves_total: register_counter_vec!(
                "meetup_page_serves_total",
                "Pages served, by page and cache outcome",
                &["page", "cache"]
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register page_serves_total: {}", e)))?,

            detail_pages_cached: register_gauge!(
                "meetup_detail_pages_cached",
                "Current number of cached detail pages"
            )
            .map_err(|e| ApiError::internal_error(format!("Failed to register detail_pages_cached: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a record store operation.
    pub fn record_store_operation(
        &self,
        operation: &str,
        backend: &str,
        success: bool,
        duration_secs: f64,
    ) {
        let status = if success { "success" } else { "error" };
        self.store_operations_total
            .with_label_values(&[operation, backend, status])
            .inc();
        self.store_operation_duration_seconds
            .with_label_values(&[operation, backend])
            .observe(duration_secs);
    }

    /// Record a page serve. `cache` is one of fresh, stale, generated or miss.
    pub fn record_page_serve(&self, page: &str, cache: &str) {
        self.page_serves_total.with_label_values(&[page, cache]).inc();
    }

    /// Set the cached detail page count.
    pub fn set_detail_pages(&self, count: usize) {
        self.detail_pages_cached.set(count as f64);
    }
}

/// Run `f` against the global metrics if they are enabled and registered.
pub fn with_metrics(f: impl FnOnce(&MeetupMetrics)) {
    if !metrics_enabled() {
        return;
    }
    if let Ok(metrics) = METRICS.as_ref() {
        f(metrics);
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 404, description = "Metrics are disabled", body = ApiError),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> Response {
    if !metrics_enabled() {
        return ApiError::route_not_found("/metrics").into_response();
    }

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
                .into_response()
        }
    }
}
