//! Submission Endpoint
//!
//! POST /api/new-meetup writes one meetup document. The route accepts every
//! method so that anything other than POST is answered with 405 before the
//! body is read or the store is touched.
//!
//! Submissions never touch the page cache; new records reach the list page on
//! its next revalidation and the detail route through its fallback policy.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, FromRequest, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use meetup_core::{MeetupId, NewMeetup};
use meetup_storage::RecordStore;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub const INSERTED_MESSAGE: &str = "Meetup inserted!";

/// Response to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmissionResponse {
    pub message: String,
}

/// POST /api/new-meetup - Insert one meetup
#[utoipa::path(
    post,
    path = "/api/new-meetup",
    tag = "Submission",
    request_body = NewMeetup,
    responses(
        (status = 201, description = "Meetup stored", body = SubmissionResponse),
        (status = 400, description = "Body is not a meetup", body = ApiError),
        (status = 405, description = "Method other than POST", body = ApiError),
        (status = 413, description = "Body larger than 64 KiB", body = ApiError),
        (status = 500, description = "Store write failed", body = ApiError),
    ),
)]
pub async fn new_meetup(
    State(store): State<Arc<dyn RecordStore>>,
    request: Request,
) -> ApiResult<Response> {
    if request.method() != Method::POST {
        let err = ApiError::method_not_allowed(request.method(), "POST");
        let mut response = err.into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST"));
        return Ok(response);
    }

    let body = Bytes::from_request(request, &())
        .await
        .map_err(body_rejection)?;
    let meetup: NewMeetup = serde_json::from_slice(&body)?;

    let id = store.insert_one(&meetup).await?;
    tracing::info!(meetup_id = %MeetupId::from_store_id(id), "Meetup inserted");

    let response = SubmissionResponse {
        message: INSERTED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

fn body_rejection(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(MAX_BODY_BYTES)
    } else {
        ApiError::invalid_input(format!("Failed to read body: {}", rejection.body_text()))
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/new-meetup", any(new_meetup))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
