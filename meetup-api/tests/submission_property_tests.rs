//! Property-Based Tests for Meetup Submission
//!
//! For any set of submitted meetups:
//! - every POST is stored and shows up on the list page after one rebuild
//! - every submitted meetup gets a detail page through the blocking fallback
//! - requests with any other method store nothing

use std::time::Duration;

use axum::http::StatusCode;
use meetup_test_utils::generators::{arb_new_meetup, arb_new_meetups, arb_non_canonical_id};
use meetup_test_utils::{MeetupId, PageConfig, RecordStore, TestSite};
use proptest::prelude::*;
use tokio::runtime::Runtime;

#[path = "support/app.rs"]
mod app;
use app::{cache_header, get, json_body, submit, test_router};

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn fail(context: &str) -> impl Fn(Box<dyn std::error::Error>) -> TestCaseError + '_ {
    move |e| TestCaseError::fail(format!("{}: {}", context, e))
}

fn config() -> PageConfig {
    PageConfig::new().with_max_staleness(Duration::from_secs(1))
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_submitted_meetups_reach_both_pages(meetups in arb_new_meetups(1, 6)) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let test_site = TestSite::built(&[], &config())
                .await
                .map_err(|e| TestCaseError::fail(format!("build failed: {}", e)))?;
            let router = test_router(&test_site);

            for meetup in &meetups {
                let body = serde_json::to_vec(meetup)
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                let response = submit(&router, "POST", body).await.map_err(fail("submit"))?;
                prop_assert_eq!(response.status(), StatusCode::CREATED);
            }

            test_site.expire_list();
            get(&router, "/").await.map_err(fail("stale list"))?;
            test_site.settle().await;

            let list = json_body(get(&router, "/").await.map_err(fail("list"))?)
                .await
                .map_err(fail("list body"))?;
            let entries = list["meetups"]
                .as_array()
                .ok_or_else(|| TestCaseError::fail("meetups is not an array"))?;
            prop_assert_eq!(entries.len(), meetups.len());
            for (entry, meetup) in entries.iter().zip(&meetups) {
                prop_assert_eq!(entry["title"].as_str(), Some(meetup.title.as_str()));
                prop_assert_eq!(entry["address"].as_str(), Some(meetup.address.as_str()));
                prop_assert!(entry.get("description").is_none());
            }

            let ids = test_site
                .store
                .list_ids()
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            for (id, meetup) in ids.into_iter().zip(&meetups) {
                let id = MeetupId::from_store_id(id);
                let response = get(&router, &format!("/meetups/{}", id))
                    .await
                    .map_err(fail("detail"))?;
                prop_assert_eq!(response.status(), StatusCode::OK);
                let detail = json_body(response).await.map_err(fail("detail body"))?;
                prop_assert_eq!(detail["meetup"]["description"].as_str(), Some(meetup.description.as_str()));
                prop_assert_eq!(detail["meetup"]["id"].as_str(), Some(id.as_str()));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_non_post_methods_store_nothing(
        meetup in arb_new_meetup(),
        method in prop_oneof![Just("GET"), Just("PUT"), Just("DELETE"), Just("PATCH")],
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let test_site = TestSite::built(&[], &config())
                .await
                .map_err(|e| TestCaseError::fail(format!("build failed: {}", e)))?;
            let router = test_router(&test_site);

            let body = serde_json::to_vec(&meetup).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let response = submit(&router, method, body).await.map_err(fail("submit"))?;
            prop_assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            prop_assert_eq!(test_site.store.call_counts().insert_one, 0);
            prop_assert!(test_site.store.is_empty());
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_non_canonical_ids_are_not_found(raw in arb_non_canonical_id()) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let test_site = TestSite::built(&[], &config())
                .await
                .map_err(|e| TestCaseError::fail(format!("build failed: {}", e)))?;
            let router = test_router(&test_site);

            let response = get(&router, &format!("/meetups/{}", raw)).await.map_err(fail("detail"))?;
            prop_assert_eq!(response.status(), StatusCode::NOT_FOUND);
            prop_assert!(cache_header(&response).is_none());
            prop_assert_eq!(test_site.store.call_counts().find_one, 0);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
