//! Stale-while-revalidate policy for the list page.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use meetup_core::{MeetupResult, MeetupSummary};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::clock::Clock;
use super::page::{CachedPage, PageRead, PageStatus};
use crate::pages::PageMaterializer;

type ListSlot = RwLock<Option<Arc<CachedPage<Vec<MeetupSummary>>>>>;

/// The list page and its revalidation state.
///
/// A page older than `max_staleness` is still served; the first request that
/// sees it stale schedules one background rebuild. While that rebuild is in
/// flight no other rebuild starts.
pub struct ListPage {
    materializer: PageMaterializer,
    clock: Arc<dyn Clock>,
    max_staleness: Duration,
    current: ListSlot,
    rebuilding: AtomicBool,
    initial_build: Mutex<()>,
    rebuilds_started: AtomicU64,
}

impl ListPage {
    pub fn new(
        materializer: PageMaterializer,
        clock: Arc<dyn Clock>,
        max_staleness: Duration,
    ) -> Self {
        Self {
            materializer,
            clock,
            max_staleness,
            current: RwLock::new(None),
            rebuilding: AtomicBool::new(false),
            initial_build: Mutex::new(()),
            rebuilds_started: AtomicU64::new(0),
        }
    }

    pub fn max_staleness(&self) -> Duration {
        self.max_staleness
    }

    /// Materialize the list now and make it the current page.
    ///
    /// Used by the build pass. Errors propagate and leave any previous page
    /// in place.
    pub async fn build(&self) -> MeetupResult<Arc<CachedPage<Vec<MeetupSummary>>>> {
        let summaries = self.materializer.materialize_list().await?;
        let page = Arc::new(CachedPage::new(summaries, self.clock.now()));
        self.replace(Arc::clone(&page));
        Ok(page)
    }

    /// Serve the list page.
    ///
    /// With no page yet, the caller builds one and waits for it. Otherwise the
    /// cached page is returned immediately, fresh or stale.
    pub async fn serve(self: &Arc<Self>) -> MeetupResult<PageRead<Vec<MeetupSummary>>> {
        let page = match self.current() {
            Some(page) => page,
            None => return self.build_first().await,
        };

        if !page.is_stale(self.clock.now(), self.max_staleness) {
            return Ok(PageRead::new(page, PageStatus::Fresh));
        }

        self.schedule_rebuild();
        Ok(PageRead::new(page, PageStatus::Stale))
    }

    /// True once a list page exists.
    pub fn is_built(&self) -> bool {
        self.current().is_some()
    }

    /// True while a background rebuild is running.
    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::SeqCst)
    }

    /// Number of background rebuilds started since creation.
    pub fn rebuilds_started(&self) -> u64 {
        self.rebuilds_started.load(Ordering::SeqCst)
    }

    fn current(&self) -> Option<Arc<CachedPage<Vec<MeetupSummary>>>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn replace(&self, page: Arc<CachedPage<Vec<MeetupSummary>>>) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(page);
    }

    async fn build_first(&self) -> MeetupResult<PageRead<Vec<MeetupSummary>>> {
        let _guard = self.initial_build.lock().await;
        if let Some(page) = self.current() {
            return Ok(PageRead::new(page, PageStatus::Fresh));
        }
        let page = self.build().await?;
        Ok(PageRead::new(page, PageStatus::Generated))
    }

    fn schedule_rebuild(self: &Arc<Self>) {
        if self
            .rebuilding
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        // A rebuild may have landed since the caller read its page.
        let still_stale = self
            .current()
            .map_or(true, |page| page.is_stale(self.clock.now(), self.max_staleness));
        if !still_stale {
            self.rebuilding.store(false, Ordering::SeqCst);
            return;
        }
        self.rebuilds_started.fetch_add(1, Ordering::SeqCst);

        let list = Arc::clone(self);
        tokio::spawn(async move {
            let _flag = InFlight(&list.rebuilding);
            match list.build().await {
                Ok(page) => debug!(
                    entries = page.value().len(),
                    "List page revalidated"
                ),
                Err(e) => warn!(error = %e, "List page rebuild failed, keeping previous page"),
            }
        });
    }
}

/// Clears the in-flight flag when the rebuild task ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
