//! The site: one list page, one detail route and the build pass over both.

use std::sync::Arc;
use std::time::Instant;

use meetup_core::{MeetupDetail, MeetupResult, MeetupSummary};
use tracing::info;

use crate::cache::{
    Clock, DetailOutcome, DetailPages, FallbackPolicy, ListPage, PageConfig, PageRead, SystemClock,
};
use crate::pages::{PageMaterializer, PathEnumerator};
use crate::store::RecordStore;

/// Summary of a completed build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub list_entries: usize,
    pub detail_pages: usize,
}

/// Owns every cached page for the service.
///
/// The record store is injected here and shared by the enumerator and the
/// materializer behind both pages.
pub struct Site {
    store: Arc<dyn RecordStore>,
    enumerator: PathEnumerator,
    list: Arc<ListPage>,
    details: DetailPages,
}

impl Site {
    pub fn new(store: Arc<dyn RecordStore>, config: &PageConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn RecordStore>, config: &PageConfig, clock: Arc<dyn Clock>) -> Self {
        let materializer = PageMaterializer::new(Arc::clone(&store));
        Self {
            enumerator: PathEnumerator::new(Arc::clone(&store)),
            list: Arc::new(ListPage::new(
                materializer.clone(),
                Arc::clone(&clock),
                config.max_staleness,
            )),
            details: DetailPages::new(materializer, clock, config.fallback),
            store,
        }
    }

    /// Enumerate, materialize the list, then every enumerated detail page.
    ///
    /// Stops at the first store error.
    pub async fn build(&self) -> MeetupResult<BuildReport> {
        let started = Instant::now();

        let paths = self.enumerator.enumerate_paths().await?;
        let list = self.list.build().await?;
        let detail_pages = self.details.build(&paths).await?;

        let report = BuildReport {
            list_entries: list.value().len(),
            detail_pages,
        };
        info!(
            list_entries = report.list_entries,
            detail_pages = report.detail_pages,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Site build complete"
        );
        Ok(report)
    }

    pub async fn list(&self) -> MeetupResult<PageRead<Vec<MeetupSummary>>> {
        self.list.serve().await
    }

    pub async fn detail(&self, raw_id: &str) -> MeetupResult<DetailOutcome> {
        self.details.resolve(raw_id).await
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn list_page(&self) -> &Arc<ListPage> {
        &self.list
    }

    pub fn detail_pages(&self) -> &DetailPages {
        &self.details
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.details.policy()
    }
}

/// Convenience for callers that only need the detail view-model.
pub fn served_detail(outcome: DetailOutcome) -> Option<PageRead<MeetupDetail>> {
    match outcome {
        DetailOutcome::Served(read) => Some(read),
        DetailOutcome::NotFound => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, PageStatus};
    use crate::store::MemoryStore;
    use chrono::Utc;
    use meetup_core::{MeetupId, NewMeetup};
    use std::time::Duration;

    fn fields(title: &str) -> NewMeetup {
        NewMeetup {
            title: title.to_string(),
            address: "addr".to_string(),
            image: "img".to_string(),
            description: format!("about {title}"),
        }
    }

    #[tokio::test]
    async fn test_build_pass_covers_all_records() -> MeetupResult<()> {
        let (store, ids) = MemoryStore::seeded(&[fields("a"), fields("b"), fields("c")])?;
        let store = Arc::new(store);
        let site = Site::new(store.clone(), &PageConfig::new().with_fallback(FallbackPolicy::Strict));

        let report = site.build().await?;
        assert_eq!(report, BuildReport { list_entries: 3, detail_pages: 3 });
        assert_eq!(store.call_counts().list_ids, 1);
        assert_eq!(store.call_counts().list_all, 1);
        assert_eq!(store.call_counts().find_one, 3);

        for id in ids {
            let id = MeetupId::from_store_id(id);
            let read = served_detail(site.detail(id.as_str()).await?).expect("prerendered");
            assert_eq!(read.value().id, id);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_build_fails_on_store_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let site = Site::new(store, &PageConfig::default());

        assert!(site.build().await.is_err());
        assert!(!site.list_page().is_built());
        assert!(site.detail_pages().is_empty());
    }

    #[tokio::test]
    async fn test_submitted_record_reaches_pages() -> MeetupResult<()> {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let site = Site::with_clock(store.clone(), &PageConfig::default(), clock.clone());
        site.build().await?;

        store.insert_one(&fields("fresh")).await?;
        assert!(site.list().await?.value().is_empty());

        clock.advance(Duration::from_secs(2));
        site.list().await?;
        while site.list_page().is_rebuilding() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let list = site.list().await?;
        assert_eq!(list.value().len(), 1);
        let entry = &list.value()[0];
        assert_eq!(entry.title, "fresh");
        assert!(!entry.id.as_str().is_empty());

        let read = served_detail(site.detail(entry.id.as_str()).await?).expect("built on demand");
        assert_eq!(read.status(), PageStatus::Generated);
        assert_eq!(read.value().description, "about fresh");
        Ok(())
    }
}
