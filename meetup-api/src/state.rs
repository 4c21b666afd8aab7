//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use meetup_storage::{RecordStore, Site};

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Cached pages and the build pass.
    pub site: Arc<Site>,
    /// Record store used by the submission endpoint. The same store backs
    /// the site, but submissions never go through the page cache.
    pub store: Arc<dyn RecordStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(site: Arc<Site>) -> Self {
        let store = Arc::clone(site.store());
        Self {
            site,
            store,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(Arc<Site>, site);
crate::impl_from_ref!(Arc<dyn RecordStore>, store);
crate::impl_from_ref!(Instant, start_time);
