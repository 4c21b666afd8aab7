//! Meetup Storage - Record Store Gateway and Page Cache
//!
//! - [`store`]: the [`RecordStore`] trait and the in-process [`MemoryStore`].
//! - [`pages`]: path enumeration and view-model materialization.
//! - [`cache`]: the list revalidation and detail fallback policies.
//! - [`site`]: the build pass tying them together.

pub mod cache;
pub mod pages;
pub mod site;
pub mod store;

pub use cache::{
    CachedPage, Clock, DetailOutcome, DetailPages, FallbackPolicy, ListPage, ManualClock,
    PageConfig, PageRead, PageStatus, SystemClock, DEFAULT_MAX_STALENESS,
};
pub use pages::{PageMaterializer, PathEnumerator};
pub use site::{served_detail, BuildReport, Site};
pub use store::{memory::CallCounts, MemoryStore, RecordStore};
