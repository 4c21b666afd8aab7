//! Page Routes
//!
//! - GET / - list page
//! - GET /meetups/:meetup_id - detail page
//!
//! Both are served from the page cache. The `x-page-cache` response header
//! reports whether the page was fresh, stale or generated for this request.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use meetup_core::{MeetupDetail, MeetupSummary, Timestamp};
use meetup_storage::{CachedPage, DetailOutcome, PageRead, Site};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::telemetry::with_metrics;

pub const PAGE_CACHE_HEADER: HeaderName = HeaderName::from_static("x-page-cache");

const LIST_TITLE: &str = "Meetups";
const LIST_DESCRIPTION: &str = "Browse a list of upcoming meetups";

// ============================================================================
// TYPES
// ============================================================================

/// Document head for a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageHead {
    pub title: String,
    pub description: String,
}

/// List page view-model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListPageResponse {
    pub head: PageHead,
    pub meetups: Vec<MeetupSummary>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub generated_at: Timestamp,
}

/// Detail page view-model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DetailPageResponse {
    pub head: PageHead,
    pub meetup: MeetupDetail,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub generated_at: Timestamp,
}

impl ListPageResponse {
    fn from_page(page: &CachedPage<Vec<MeetupSummary>>) -> Self {
        Self {
            head: PageHead {
                title: LIST_TITLE.to_string(),
                description: LIST_DESCRIPTION.to_string(),
            },
            meetups: page.value().clone(),
            generated_at: page.generated_at(),
        }
    }
}

impl DetailPageResponse {
    fn from_page(page: &CachedPage<MeetupDetail>) -> Self {
        let meetup = page.value().clone();
        Self {
            head: PageHead {
                title: meetup.title.clone(),
                description: meetup.description.clone(),
            },
            meetup,
            generated_at: page.generated_at(),
        }
    }
}

fn with_cache_header<T, B>(read: &PageRead<T>, body: B) -> Response
where
    B: Serialize,
{
    let status = read.status().as_str();
    (
        [(PAGE_CACHE_HEADER, HeaderValue::from_static(status))],
        Json(body),
    )
        .into_response()
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET / - The list of all meetups
#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    responses(
        (status = 200, description = "List page", body = ListPageResponse,
            headers(("x-page-cache" = String, description = "fresh, stale or generated"))),
        (status = 500, description = "List page could not be built", body = ApiError),
    ),
)]
pub async fn list_page(State(site): State<Arc<Site>>) -> ApiResult<Response> {
    let read = site.list().await?;
    with_metrics(|m| m.record_page_serve("list", read.status().as_str()));
    let body = ListPageResponse::from_page(read.page());
    Ok(with_cache_header(&read, body))
}

/// GET /meetups/{meetup_id} - One meetup
#[utoipa::path(
    get,
    path = "/meetups/{meetup_id}",
    tag = "Pages",
    params(
        ("meetup_id" = String, Path, description = "Canonical meetup id")
    ),
    responses(
        (status = 200, description = "Detail page", body = DetailPageResponse,
            headers(("x-page-cache" = String, description = "fresh, stale or generated"))),
        (status = 404, description = "No such meetup", body = ApiError),
        (status = 500, description = "Detail page could not be built", body = ApiError),
    ),
)]
pub async fn detail_page(
    State(site): State<Arc<Site>>,
    Path(meetup_id): Path<String>,
) -> ApiResult<Response> {
    match site.detail(&meetup_id).await? {
        DetailOutcome::Served(read) => {
            with_metrics(|m| {
                m.record_page_serve("detail", read.status().as_str());
                m.set_detail_pages(site.detail_pages().len());
            });
            let body = DetailPageResponse::from_page(read.page());
            Ok(with_cache_header(&read, body))
        }
        DetailOutcome::NotFound => {
            with_metrics(|m| m.record_page_serve("detail", "miss"));
            Err(ApiError::meetup_not_found(&meetup_id))
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_page))
        .route("/meetups/:meetup_id", get(detail_page))
}
