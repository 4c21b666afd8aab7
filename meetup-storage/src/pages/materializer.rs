//! Fetch documents and project them into page view-models.

use std::sync::Arc;

use meetup_core::{MeetupDetail, MeetupId, MeetupResult, MeetupSummary};

use crate::store::RecordStore;

/// Produces the list and detail view-models from the record store.
///
/// Every call goes to the store through its own connection. Nothing is
/// cached or retried here; that is the page cache's job.
#[derive(Clone)]
pub struct PageMaterializer {
    store: Arc<dyn RecordStore>,
}

impl PageMaterializer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// All records, projected to the list shape, in store order.
    pub async fn materialize_list(&self) -> MeetupResult<Vec<MeetupSummary>> {
        let documents = self.store.list_all().await?;
        Ok(documents.iter().map(|doc| doc.to_summary()).collect())
    }

    /// The detail view-model for `id`, or `None` when no record matches.
    ///
    /// An id that is not in canonical form cannot match any record and is
    /// reported as `None` without a store round-trip.
    pub async fn materialize_detail(&self, id: &MeetupId) -> MeetupResult<Option<MeetupDetail>> {
        self.materialize_detail_str(id.as_str()).await
    }

    /// Same as [`materialize_detail`](Self::materialize_detail) for a raw
    /// path parameter.
    pub async fn materialize_detail_str(&self, raw: &str) -> MeetupResult<Option<MeetupDetail>> {
        let Some(store_id) = MeetupId::parse_canonical(raw) else {
            return Ok(None);
        };
        let document = self.store.find_one(store_id).await?;
        Ok(document.map(|doc| doc.into_detail()))
    }
}
