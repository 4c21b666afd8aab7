//! REST API Routes Module
//!
//! Assembles the page, submission, health and observability routes into one
//! Axum router with CORS and request instrumentation.

pub mod health;
pub mod pages;
pub mod submission;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, request::Parts, HeaderValue, Method, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use meetup_storage::Site;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Catch-all for unknown paths, so 404s share the JSON error shape.
async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}

fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([pages::PAGE_CACHE_HEADER])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let allowed = config.clone();
        cors.allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| allowed.is_origin_allowed(origin))
                    .unwrap_or(false)
            },
        ))
    }
}

/// Create the complete router around an already-built site.
pub fn create_api_router(site: Arc<Site>, api_config: &ApiConfig) -> Router {
    let state = AppState::new(site);

    Router::new()
        .merge(pages::create_router())
        .merge(submission::create_router())
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(api_config))
}
