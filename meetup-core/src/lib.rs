//! Meetup Core - Record Types
//!
//! Plain data structures shared by every other crate: the stored document,
//! the list/detail view-models, identifiers and the error taxonomy.
//! No I/O lives here.

pub mod entities;
pub mod error;
pub mod identity;

pub use entities::{MeetupDetail, MeetupDocument, MeetupSummary, NewMeetup};
pub use error::{ConfigError, MeetupError, MeetupResult, StoreError};
pub use identity::{new_store_id, MeetupId, StoreId};

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
