//! Cached pages and the metadata returned with every page read.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// A materialized view-model and the moment it was generated.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage<T> {
    value: T,
    generated_at: DateTime<Utc>,
}

impl<T> CachedPage<T> {
    pub fn new(value: T, generated_at: DateTime<Utc>) -> Self {
        Self {
            value,
            generated_at,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Age of the page as seen at `now`. Never negative.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.generated_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// True once the page is strictly older than `max_staleness`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_staleness: Duration) -> bool {
        self.age(now) > max_staleness
    }
}

/// How a page read was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// Served from cache within its staleness window.
    Fresh,
    /// Served from cache past its window; a rebuild was or is being scheduled.
    Stale,
    /// Generated while the caller waited.
    Generated,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Generated => "generated",
        }
    }
}

/// A served page plus how it was obtained.
#[derive(Debug, Clone)]
pub struct PageRead<T> {
    page: Arc<CachedPage<T>>,
    status: PageStatus,
}

impl<T> PageRead<T> {
    pub fn new(page: Arc<CachedPage<T>>, status: PageStatus) -> Self {
        Self { page, status }
    }

    pub fn value(&self) -> &T {
        self.page.value()
    }

    pub fn page(&self) -> &Arc<CachedPage<T>> {
        &self.page
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.page.generated_at()
    }
}
