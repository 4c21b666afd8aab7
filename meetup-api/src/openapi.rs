//! OpenAPI Specification for the Meetup API
//!
//! Generated with utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use meetup_core::{MeetupDetail, MeetupId, MeetupSummary, NewMeetup};

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus, PagesHealth};
use crate::routes::pages::{DetailPageResponse, ListPageResponse, PageHead};
use crate::routes::submission::SubmissionResponse;
use crate::routes::{health, pages, submission};
use crate::telemetry::metrics;

/// OpenAPI document for the Meetup API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meetup API",
        version = "0.1.0",
        description = "Meetup list and detail pages with a cached build, plus meetup submission",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Pages", description = "Cached list and detail pages"),
        (name = "Submission", description = "Create meetups"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        pages::list_page,
        pages::detail_page,
        submission::new_meetup,
        health::ping,
        health::liveness,
        health::readiness,
        metrics::metrics_handler,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        NewMeetup,
        MeetupId,
        MeetupSummary,
        MeetupDetail,
        PageHead,
        ListPageResponse,
        DetailPageResponse,
        SubmissionResponse,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
        PagesHealth,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Pretty-printed JSON document.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_json_generation() -> Result<(), serde_json::Error> {
        let json = ApiDoc::to_json()?;
        assert!(json.contains("\"title\": \"Meetup API\""));
        assert!(json.contains("/health/ready"));
        assert!(json.contains("SubmissionResponse"));
        Ok(())
    }

    #[test]
    fn test_page_timestamps_are_date_time_strings() -> Result<(), serde_json::Error> {
        let doc = serde_json::to_value(ApiDoc::openapi())?;
        for schema in ["ListPageResponse", "DetailPageResponse"] {
            let field = &doc["components"]["schemas"][schema]["properties"]["generated_at"];
            assert_eq!(field["type"], "string", "{} generated_at", schema);
            assert_eq!(field["format"], "date-time", "{} generated_at", schema);
        }
        Ok(())
    }
}
