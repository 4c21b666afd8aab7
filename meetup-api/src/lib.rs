//! Meetup API - HTTP Layer
//!
//! Serves the cached meetup list and detail pages, accepts new meetups and
//! exposes health, metrics and OpenAPI endpoints. The page cache itself
//! lives in `meetup-storage`; this crate wires it to a record store backend
//! and to Axum.

pub mod config;
pub mod db;
pub mod error;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use meetup_storage::{RecordStore, Site};

pub use config::ApiConfig;
pub use db::{open_store, DbConfig, MeteredStore, PgRecordStore, StoreBackend};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;

/// Build the site over `store` and run its build pass.
///
/// A failed build is fatal: the service does not start with a partial set of
/// pages.
pub async fn build_site(store: Arc<dyn RecordStore>, api_config: &ApiConfig) -> ApiResult<Arc<Site>> {
    let site = Arc::new(Site::new(store, &api_config.page_config()));
    let report = site.build().await?;
    telemetry::with_metrics(|m| m.set_detail_pages(report.detail_pages));
    tracing::info!(
        list_entries = report.list_entries,
        detail_pages = report.detail_pages,
        fallback = %api_config.fallback,
        revalidate_secs = api_config.revalidate_after.as_secs(),
        "Pages built"
    );
    Ok(site)
}
