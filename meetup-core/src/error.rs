//! Error types for meetup operations

use std::time::Duration;
use thiserror::Error;

/// Configuration errors. Always fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store connection failed: {reason}")]
    ConnectFailed { reason: String },

    #[error("Store operation {operation} failed: {reason}")]
    QueryFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("Store operation {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Malformed document {id}: {reason}")]
    MalformedDocument { id: String, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Master error type for all meetup errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MeetupError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl MeetupError {
    /// Shorthand for a failed query.
    pub fn query_failed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Store(StoreError::QueryFailed {
            operation,
            reason: reason.into(),
        })
    }

    /// Shorthand for a missing required setting.
    pub fn missing_config(field: impl Into<String>) -> Self {
        Self::Config(ConfigError::MissingRequired {
            field: field.into(),
        })
    }
}

/// Result type alias for meetup operations.
pub type MeetupResult<T> = Result<T, MeetupError>;

// =============================================================================
// TESTS
// =============================================================================
