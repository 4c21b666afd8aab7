//! Build-time enumeration of pre-renderable detail paths.

use std::collections::BTreeSet;
use std::sync::Arc;

use meetup_core::{MeetupId, MeetupResult};

use crate::store::RecordStore;

/// Asks the store for every record id and renders each in canonical form.
#[derive(Clone)]
pub struct PathEnumerator {
    store: Arc<dyn RecordStore>,
}

impl PathEnumerator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The full set of detail-page identifiers.
    ///
    /// A store error fails the whole call: an incomplete set would silently
    /// leave pages out of the build.
    pub async fn enumerate_paths(&self) -> MeetupResult<BTreeSet<MeetupId>> {
        let ids = self.store.list_ids().await?;
        Ok(ids.into_iter().map(MeetupId::from_store_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use meetup_core::{MeetupError, NewMeetup};
    use proptest::prelude::*;

    fn fields(n: usize) -> NewMeetup {
        NewMeetup {
            title: format!("meetup {n}"),
            address: "somewhere".to_string(),
            image: "img".to_string(),
            description: "desc".to_string(),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_one_path_per_record(count in 0usize..40) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {e}")))?;
            let meetups: Vec<_> = (0..count).map(fields).collect();
            let (store, ids) = MemoryStore::seeded(&meetups)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let enumerator = PathEnumerator::new(Arc::new(store));

            let paths = rt
                .block_on(enumerator.enumerate_paths())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(paths.len(), count);
            for id in ids {
                prop_assert!(paths.contains(&MeetupId::from_store_id(id)));
            }
        }
    }

    #[tokio::test]
    async fn test_store_error_fails_enumeration() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let enumerator = PathEnumerator::new(store);

        let result = enumerator.enumerate_paths().await;
        assert!(matches!(result, Err(MeetupError::Store(_))));
    }
}
