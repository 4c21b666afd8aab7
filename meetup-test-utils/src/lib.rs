//! Meetup Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - Proptest generators for submitted meetups
//! - Fixtures for common record sets
//! - Helpers that assemble a store and site over a manual clock

pub use meetup_core::{
    MeetupDetail, MeetupDocument, MeetupError, MeetupId, MeetupResult, MeetupSummary, NewMeetup,
    StoreId,
};
pub use meetup_storage::{
    CallCounts, FallbackPolicy, ManualClock, MemoryStore, PageConfig, PageStatus, RecordStore,
    Site,
};

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    /// Short printable text, never empty.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.'-]{0,40}"
    }

    /// Image references as clients send them.
    pub fn arb_image() -> impl Strategy<Value = String> {
        "[a-z]{3,12}".prop_map(|name| format!("https://images.example.com/{}.jpg", name))
    }

    /// A complete submission body.
    pub fn arb_new_meetup() -> impl Strategy<Value = NewMeetup> {
        (arb_text(), arb_text(), arb_image(), arb_text()).prop_map(
            |(title, address, image, description)| NewMeetup {
                title,
                address,
                image,
                description,
            },
        )
    }

    /// Between `min` and `max` submissions.
    pub fn arb_new_meetups(min: usize, max: usize) -> impl Strategy<Value = Vec<NewMeetup>> {
        prop::collection::vec(arb_new_meetup(), min..=max)
    }

    /// Path segments that are not canonical meetup ids.
    pub fn arb_non_canonical_id() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}"
                .prop_filter("needs an upper-case hex digit", |s| s
                    .chars()
                    .any(|c| c.is_ascii_uppercase())),
            "[0-9a-f]{32}",
            "[a-z]{1,20}",
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    /// A meetup with recognizable fields.
    pub fn sample_meetup(n: usize) -> NewMeetup {
        NewMeetup {
            title: format!("Meetup #{}", n),
            address: format!("{} Main Street", n),
            image: format!("https://images.example.com/{}.jpg", n),
            description: format!("Description of meetup {}", n),
        }
    }

    /// `count` sample meetups.
    pub fn sample_meetups(count: usize) -> Vec<NewMeetup> {
        (1..=count).map(sample_meetup).collect()
    }

    /// Fixed starting instant for manual clocks.
    pub fn epoch() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

// ============================================================================
// SITE HELPERS
// ============================================================================

/// A store, the site over it and the clock driving the site's pages.
pub struct TestSite {
    pub store: Arc<MemoryStore>,
    pub site: Arc<Site>,
    pub clock: Arc<ManualClock>,
    pub ids: Vec<StoreId>,
}

impl TestSite {
    /// Seed a memory store and construct an unbuilt site over it.
    pub fn new(meetups: &[NewMeetup], config: &PageConfig) -> MeetupResult<Self> {
        let (store, ids) = MemoryStore::seeded(meetups)?;
        let store = Arc::new(store);
        let clock = Arc::new(ManualClock::new(fixtures::epoch()));
        let dyn_store: Arc<dyn RecordStore> = store.clone();
        let site = Arc::new(Site::with_clock(dyn_store, config, clock.clone()));
        Ok(Self {
            store,
            site,
            clock,
            ids,
        })
    }

    /// Seed, construct and run the build pass.
    pub async fn built(meetups: &[NewMeetup], config: &PageConfig) -> MeetupResult<Self> {
        let test_site = Self::new(meetups, config)?;
        test_site.site.build().await?;
        Ok(test_site)
    }

    /// Canonical id of the `index`-th seeded record.
    pub fn meetup_id(&self, index: usize) -> Option<MeetupId> {
        self.ids.get(index).copied().map(MeetupId::from_store_id)
    }

    /// Move the clock past the list page's staleness window.
    pub fn expire_list(&self) {
        let window = self.site.list_page().max_staleness();
        self.clock.advance(window + Duration::from_millis(1));
    }

    /// Wait until no list rebuild is in flight.
    pub async fn settle(&self) {
        while self.site.list_page().is_rebuilding() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
