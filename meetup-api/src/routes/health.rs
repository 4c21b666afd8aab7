//! Health Check Endpoints
//!
//! - /health/ping - plain-text pong
//! - /health/live - the process is up
//! - /health/ready - the store answers and the list page has been built

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use meetup_storage::Site;

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Degraded,
}

impl HealthStatus {
    /// Only a healthy service takes traffic.
    pub fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthDetails {
    pub store: ComponentHealth,
    pub pages: PagesHealth,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// State of the page cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PagesHealth {
    pub list_built: bool,
    pub list_rebuilding: bool,
    pub detail_pages: usize,
    pub fallback: String,
}

impl PagesHealth {
    fn of(site: &Site) -> Self {
        let list = site.list_page();
        Self {
            list_built: list.is_built(),
            list_rebuilding: list.is_rebuilding(),
            detail_pages: site.detail_pages().len(),
            fallback: site.fallback().to_string(),
        }
    }
}

/// Store trouble outranks an unbuilt list page.
fn readiness_status(store: &ComponentHealth, pages: &PagesHealth) -> HealthStatus {
    match (store.status, pages.list_built) {
        (HealthStatus::Healthy, true) => HealthStatus::Healthy,
        (HealthStatus::Healthy, false) => HealthStatus::Degraded,
        _ => HealthStatus::Unhealthy,
    }
}

async fn check_store(site: &Site) -> ComponentHealth {
    let start = Instant::now();
    match site.store().ping().await {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness store ping failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: None,
                error: Some(format!("Store check failed: {}", e)),
            }
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> &'static str {
    "pong"
}

/// GET /health/live
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    })
}

/// GET /health/ready
///
/// Unhealthy when the store cannot be reached; degraded while the list page
/// has not been built yet.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Service is not ready", body = HealthResponse),
    ),
)]
pub async fn readiness(
    State(site): State<Arc<Site>>,
    State(start_time): State<Instant>,
) -> impl IntoResponse {
    let store = check_store(&site).await;
    let pages = PagesHealth::of(&site);
    let status = readiness_status(&store, &pages);

    let response = HealthResponse {
        status,
        message: None,
        details: Some(HealthDetails {
            store,
            pages,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: start_time.elapsed().as_secs(),
        }),
    };

    (status.status_code(), Json(response))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            status,
            latency_ms: None,
            error: None,
        }
    }

    fn pages(list_built: bool) -> PagesHealth {
        PagesHealth {
            list_built,
            list_rebuilding: false,
            detail_pages: 0,
            fallback: "blocking".to_string(),
        }
    }

    #[test]
    fn test_readiness_matrix() {
        let healthy = component(HealthStatus::Healthy);
        let down = component(HealthStatus::Unhealthy);

        assert_eq!(readiness_status(&healthy, &pages(true)), HealthStatus::Healthy);
        assert_eq!(readiness_status(&healthy, &pages(false)), HealthStatus::Degraded);
        assert_eq!(readiness_status(&down, &pages(true)), HealthStatus::Unhealthy);
        assert_eq!(readiness_status(&down, &pages(false)), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_only_healthy_is_ok() {
        assert_eq!(HealthStatus::Healthy.status_code(), StatusCode::OK);
        assert_eq!(HealthStatus::Degraded.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(HealthStatus::Unhealthy.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_liveness_omits_details() -> Result<(), serde_json::Error> {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            message: Some("Process is alive".to_string()),
            details: None,
        };

        let json = serde_json::to_string(&response)?;
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(!json.contains("details"));
        Ok(())
    }
}
