//! In-process record store.
//!
//! Used for local development (`DATABASE_URL=memory://`) and as the fake
//! store in tests. Documents are kept in insertion order, which is the
//! natural order `list_all` reports.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use meetup_core::{
    new_store_id, MeetupDocument, MeetupError, MeetupResult, NewMeetup, StoreError, StoreId,
};

use super::RecordStore;

/// Per-operation call counters.
#[derive(Debug, Default)]
struct CallCounters {
    list_ids: AtomicU64,
    list_all: AtomicU64,
    find_one: AtomicU64,
    insert_one: AtomicU64,
}

/// Snapshot of how often each operation was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_ids: u64,
    pub list_all: u64,
    pub find_one: u64,
    pub insert_one: u64,
}

/// Record store backed by a `Vec` behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<MeetupDocument>>,
    calls: CallCounters,
    failing: AtomicBool,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency` before it touches the data.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Create a store pre-populated with the given fields, returning the ids
    /// in insertion order.
    pub fn seeded(meetups: &[NewMeetup]) -> MeetupResult<(Self, Vec<StoreId>)> {
        let store = Self::new();
        let mut ids = Vec::with_capacity(meetups.len());
        for meetup in meetups {
            ids.push(store.insert_now(meetup)?);
        }
        Ok((store, ids))
    }

    /// Make every subsequent operation fail with a connection error until
    /// switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How often each operation has been called so far.
    pub fn call_counts(&self) -> CallCounts {
        CallCounts {
            list_ids: self.calls.list_ids.load(Ordering::SeqCst),
            list_all: self.calls.list_all.load(Ordering::SeqCst),
            find_one: self.calls.find_one.load(Ordering::SeqCst),
            insert_one: self.calls.insert_one.load(Ordering::SeqCst),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    /// True if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_now(&self, meetup: &NewMeetup) -> MeetupResult<StoreId> {
        let id = new_store_id();
        let mut docs = self
            .documents
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        docs.push(MeetupDocument::from_parts(id, meetup.clone()));
        Ok(id)
    }

    async fn enter(&self, counter: &AtomicU64) -> MeetupResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MeetupError::Store(StoreError::ConnectFailed {
                reason: "memory store set to fail".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_ids(&self) -> MeetupResult<Vec<StoreId>> {
        self.enter(&self.calls.list_ids).await?;
        let docs = self.documents.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(docs.iter().map(|doc| doc.id).collect())
    }

    async fn list_all(&self) -> MeetupResult<Vec<MeetupDocument>> {
        self.enter(&self.calls.list_all).await?;
        let docs = self.documents.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(docs.clone())
    }

    async fn find_one(&self, id: StoreId) -> MeetupResult<Option<MeetupDocument>> {
        self.enter(&self.calls.find_one).await?;
        let docs = self.documents.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(docs.iter().find(|doc| doc.id == id).cloned())
    }

    async fn insert_one(&self, meetup: &NewMeetup) -> MeetupResult<StoreId> {
        self.enter(&self.calls.insert_one).await?;
        self.insert_now(meetup)
    }

    async fn ping(&self) -> MeetupResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MeetupError::Store(StoreError::ConnectFailed {
                reason: "memory store set to fail".to_string(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str) -> NewMeetup {
        NewMeetup {
            title: title.to_string(),
            address: "addr".to_string(),
            image: "img".to_string(),
            description: "desc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() -> MeetupResult<()> {
        let store = MemoryStore::new();
        let id = store.insert_one(&fields("one")).await?;

        let found = store.find_one(id).await?.expect("inserted document");
        assert_eq!(found.id, id);
        assert_eq!(found.title, "one");
        assert!(store.find_one(new_store_id()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() -> MeetupResult<()> {
        let (store, ids) = MemoryStore::seeded(&[fields("a"), fields("b"), fields("c")])?;

        assert_eq!(store.list_ids().await?, ids);
        let titles: Vec<_> = store
            .list_all()
            .await?
            .into_iter()
            .map(|doc| doc.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_injection_and_counts() -> MeetupResult<()> {
        let store = MemoryStore::new();
        store.set_failing(true);

        let err = store.list_all().await.expect_err("store is failing");
        assert!(matches!(err, MeetupError::Store(StoreError::ConnectFailed { .. })));
        assert!(store.ping().await.is_err());

        store.set_failing(false);
        store.list_all().await?;
        assert_eq!(store.call_counts().list_all, 2);
        assert_eq!(store.call_counts().find_one, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seeded_does_not_count_as_calls() -> MeetupResult<()> {
        let (store, ids) = MemoryStore::seeded(&[fields("a")])?;
        assert_eq!(ids.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.call_counts(), CallCounts::default());
        Ok(())
    }
}
