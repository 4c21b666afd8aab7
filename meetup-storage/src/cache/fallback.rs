//! Detail pages and the policy for identifiers outside the pre-rendered set.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use meetup_core::{ConfigError, MeetupDetail, MeetupId, MeetupResult};
use tracing::{debug, warn};

use super::clock::Clock;
use super::coalesce::BuildCoalescer;
use super::page::{CachedPage, PageRead, PageStatus};
use crate::pages::PageMaterializer;

/// What the detail route does with an identifier it has no page for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Only pre-rendered identifiers are served; anything else is not found.
    Strict,
    /// Unknown identifiers are built on demand while the request waits.
    #[default]
    Blocking,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Blocking => "blocking",
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FallbackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "false" => Ok(Self::Strict),
            "blocking" | "true" => Ok(Self::Blocking),
            other => Err(ConfigError::InvalidValue {
                field: "fallback".to_string(),
                value: other.to_string(),
                reason: "expected one of: strict, blocking".to_string(),
            }),
        }
    }
}

/// Result of resolving a detail request.
#[derive(Debug, Clone)]
pub enum DetailOutcome {
    Served(PageRead<MeetupDetail>),
    NotFound,
}

impl DetailOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

type DetailMap = HashMap<MeetupId, Arc<CachedPage<MeetupDetail>>>;

/// The set of cached detail pages under one fallback policy.
pub struct DetailPages {
    materializer: PageMaterializer,
    clock: Arc<dyn Clock>,
    policy: FallbackPolicy,
    pages: RwLock<DetailMap>,
    coalescer: BuildCoalescer,
}

impl DetailPages {
    pub fn new(materializer: PageMaterializer, clock: Arc<dyn Clock>, policy: FallbackPolicy) -> Self {
        Self {
            materializer,
            clock,
            policy,
            pages: RwLock::new(HashMap::new()),
            coalescer: BuildCoalescer::new(),
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Materialize a page for every id in `ids` and add it to the set.
    ///
    /// Any store error aborts the pass. Ids whose document has vanished are
    /// skipped. Returns the number of pages built.
    pub async fn build(&self, ids: &BTreeSet<MeetupId>) -> MeetupResult<usize> {
        let mut built = HashMap::with_capacity(ids.len());
        for id in ids {
            match self.materializer.materialize_detail(id).await? {
                Some(detail) => {
                    built.insert(id.clone(), Arc::new(CachedPage::new(detail, self.clock.now())));
                }
                None => warn!(meetup_id = %id, "Enumerated meetup has no document, skipping"),
            }
        }
        let count = built.len();
        self.write_pages().extend(built);
        Ok(count)
    }

    /// Resolve a raw path parameter to a detail page.
    pub async fn resolve(&self, raw_id: &str) -> MeetupResult<DetailOutcome> {
        if let Some(page) = self.lookup(raw_id) {
            return Ok(DetailOutcome::Served(PageRead::new(page, PageStatus::Fresh)));
        }

        match self.policy {
            FallbackPolicy::Strict => Ok(DetailOutcome::NotFound),
            FallbackPolicy::Blocking => self.build_on_demand(raw_id).await,
        }
    }

    /// True if `raw_id` has a cached page.
    pub fn is_prerendered(&self, raw_id: &str) -> bool {
        self.lookup(raw_id).is_some()
    }

    /// Number of cached detail pages.
    pub fn len(&self) -> usize {
        self.read_pages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn build_on_demand(&self, raw_id: &str) -> MeetupResult<DetailOutcome> {
        if MeetupId::parse_canonical(raw_id).is_none() {
            return Ok(DetailOutcome::NotFound);
        }

        let _guard = self.coalescer.acquire(raw_id).await;
        if let Some(page) = self.lookup(raw_id) {
            return Ok(DetailOutcome::Served(PageRead::new(page, PageStatus::Fresh)));
        }

        let Some(detail) = self.materializer.materialize_detail_str(raw_id).await? else {
            debug!(meetup_id = raw_id, "No document for requested meetup");
            return Ok(DetailOutcome::NotFound);
        };

        let id = detail.id.clone();
        let page = Arc::new(CachedPage::new(detail, self.clock.now()));
        self.write_pages().insert(id, Arc::clone(&page));
        debug!(meetup_id = raw_id, "Detail page built on demand");
        Ok(DetailOutcome::Served(PageRead::new(page, PageStatus::Generated)))
    }

    fn lookup(&self, raw_id: &str) -> Option<Arc<CachedPage<MeetupDetail>>> {
        self.read_pages().get(raw_id).map(Arc::clone)
    }

    fn read_pages(&self) -> std::sync::RwLockReadGuard<'_, DetailMap> {
        self.pages.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_pages(&self) -> std::sync::RwLockWriteGuard<'_, DetailMap> {
        self.pages.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
