//! Record store gateway.
//!
//! [`RecordStore`] is the only seam between the page layer and the document
//! store. Implementations open a connection per call, run one query and
//! release the connection before returning, on success and on error alike.
//! Nothing here retries.

pub mod memory;

use async_trait::async_trait;
use meetup_core::{MeetupDocument, MeetupResult, NewMeetup, StoreId};

pub use memory::MemoryStore;

/// Async gateway to the meetup document collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record id, no filter, projected to the id only.
    async fn list_ids(&self) -> MeetupResult<Vec<StoreId>>;

    /// Every record, in the store's natural order.
    async fn list_all(&self) -> MeetupResult<Vec<MeetupDocument>>;

    /// Exactly one record by id, or `None` if nothing matches.
    async fn find_one(&self, id: StoreId) -> MeetupResult<Option<MeetupDocument>>;

    /// Insert the fields verbatim and return the store-assigned id.
    async fn insert_one(&self, meetup: &NewMeetup) -> MeetupResult<StoreId>;

    /// Round-trip to the store for readiness checks.
    async fn ping(&self) -> MeetupResult<()>;
}
