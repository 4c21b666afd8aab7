//! End-to-end smoke tests against PostgreSQL.
//!
//! Run with `--features db-tests` and a `DATABASE_URL` pointing at a
//! disposable database.

#[cfg(feature = "db-tests")]
mod postgres {
    use meetup_api::{build_site, open_store, ApiConfig, ApiResult, DbConfig};
    use meetup_core::MeetupId;
    use meetup_test_utils::fixtures::sample_meetup;
    use meetup_storage::{served_detail, RecordStore};

    #[tokio::test]
    async fn smoke_test_insert_list_detail() -> ApiResult<()> {
        let db_config = DbConfig::from_env().map_err(meetup_core::MeetupError::from)?;
        let store = open_store(&db_config).await?;
        store.ping().await?;

        let marker = format!("smoke {}", meetup_core::new_store_id());
        let mut meetup = sample_meetup(1);
        meetup.title = marker.clone();
        let id = store.insert_one(&meetup).await?;

        let ids = store.list_ids().await?;
        assert!(ids.contains(&id));

        let site = build_site(store, &ApiConfig::default()).await?;
        let list = site.list().await?;
        assert!(list.value().iter().any(|entry| entry.title == marker));

        let meetup_id = MeetupId::from_store_id(id);
        assert!(site.detail_pages().is_prerendered(meetup_id.as_str()));
        let outcome = site.detail(meetup_id.as_str()).await?;
        let title = served_detail(outcome).map(|read| read.value().title.clone());
        assert_eq!(title.as_deref(), Some(marker.as_str()));
        Ok(())
    }
}
