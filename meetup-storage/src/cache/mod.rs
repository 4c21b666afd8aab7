//! Page cache with explicit freshness.
//!
//! Two fixed policies live here: time-window revalidation for the list page
//! ([`ListPage`]) and build-time-or-on-demand materialization for detail pages
//! ([`DetailPages`] under a [`FallbackPolicy`]). Every read returns a
//! [`PageRead`] that says whether the page was fresh, stale or generated for
//! the caller.

pub mod clock;
pub mod coalesce;
pub mod fallback;
pub mod page;
pub mod revalidate;

use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coalesce::{BuildCoalescer, BuildGuard};
pub use fallback::{DetailOutcome, DetailPages, FallbackPolicy};
pub use page::{CachedPage, PageRead, PageStatus};
pub use revalidate::ListPage;

/// Default revalidation window for the list page.
pub const DEFAULT_MAX_STALENESS: Duration = Duration::from_secs(1);

/// Configuration for the page cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Age after which the list page is rebuilt in the background.
    pub max_staleness: Duration,
    /// Policy for detail identifiers that were not pre-rendered.
    pub fallback: FallbackPolicy,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_staleness: DEFAULT_MAX_STALENESS,
            fallback: FallbackPolicy::Blocking,
        }
    }
}

impl PageConfig {
    /// Create a new page config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list page revalidation window.
    pub fn with_max_staleness(mut self, duration: Duration) -> Self {
        self.max_staleness = duration;
        self
    }

    /// Set the detail fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_builder() {
        let config = PageConfig::new()
            .with_max_staleness(Duration::from_secs(30))
            .with_fallback(FallbackPolicy::Strict);
        assert_eq!(config.max_staleness, Duration::from_secs(30));
        assert_eq!(config.fallback, FallbackPolicy::Strict);

        let defaults = PageConfig::default();
        assert_eq!(defaults.max_staleness, Duration::from_secs(1));
        assert_eq!(defaults.fallback, FallbackPolicy::Blocking);
    }
}
