//! Error Types for the Meetup API
//!
//! This module defines error handling for the HTTP layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meetup_core::{ConfigError, MeetupError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request contains invalid input data
    InvalidInput,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// Requested meetup does not exist
    MeetupNotFound,

    /// No route matches the request path
    RouteNotFound,

    // ========================================================================
    // Method Errors (405)
    // ========================================================================
    /// The endpoint does not accept this HTTP method
    MethodNotAllowed,

    // ========================================================================
    // Size Errors (413)
    // ========================================================================
    /// Request body exceeds the accepted size
    PayloadTooLarge,

    // ========================================================================
    // Server Errors (500, 503, 504)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Service configuration is invalid
    ConfigurationError,

    /// Database operation failed
    DatabaseError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Operation timed out
    Timeout,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::MeetupNotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::InternalError
            | ErrorCode::ConfigurationError
            | ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MeetupNotFound => "Meetup not found",
            ErrorCode::RouteNotFound => "Not found",
            ErrorCode::MethodNotAllowed => "Method not allowed",
            ErrorCode::PayloadTooLarge => "Request body too large",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigurationError => "Service is misconfigured",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::Timeout => "Operation timed out",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MeetupNotFound error.
    pub fn meetup_not_found(meetup_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::MeetupNotFound,
            format!("Meetup {} not found", meetup_id),
        )
    }

    /// Create a RouteNotFound error.
    pub fn route_not_found(path: &str) -> Self {
        Self::new(ErrorCode::RouteNotFound, format!("No route for {}", path))
    }

    /// Create a MethodNotAllowed error.
    pub fn method_not_allowed(method: impl fmt::Display, allowed: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotAllowed,
            format!("Method {} not allowed, use {}", method, allowed),
        )
    }

    /// Create a PayloadTooLarge error.
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            ErrorCode::PayloadTooLarge,
            format!("Request body exceeds {} bytes", limit_bytes),
        )
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a ConfigurationError.
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Create a Timeout error.
    pub fn timeout(operation: &str) -> Self {
        Self::new(
            ErrorCode::Timeout,
            format!("Operation '{}' timed out", operation),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Convert from MeetupError to ApiError.
///
/// Store details are logged and replaced by a generic message.
impl From<MeetupError> for ApiError {
    fn from(err: MeetupError) -> Self {
        match err {
            MeetupError::Config(ConfigError::MissingRequired { field }) => {
                tracing::error!(field = %field, "Missing configuration");
                ApiError::configuration_error(format!("Missing configuration: {}", field))
            }
            MeetupError::Config(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                ApiError::configuration_error(e.to_string())
            }
            MeetupError::Store(StoreError::Timeout { operation, .. }) => {
                tracing::error!(operation, "Store operation timed out");
                ApiError::timeout(operation)
            }
            MeetupError::Store(StoreError::ConnectFailed { reason }) => {
                tracing::error!(reason = %reason, "Store connection failed");
                ApiError::service_unavailable(ErrorCode::ServiceUnavailable.default_message())
            }
            MeetupError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                ApiError::database_error(ErrorCode::DatabaseError.default_message())
            }
        }
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!("JSON body rejected: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err)).with_details(serde_json::json!({
            "line": err.line(),
            "column": err.column(),
        }))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
