//! Meetup Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing`, Prometheus metrics and the request
//! middleware that ties them together.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{
    metrics_enabled, metrics_handler, set_metrics_enabled, with_metrics, MeetupMetrics, METRICS,
};
pub use middleware::observability_middleware;
pub use tracer::{init_tracing, LogFormat, TelemetryConfig};
