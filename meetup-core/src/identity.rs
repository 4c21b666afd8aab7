//! Identity types for meetup records

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Native identifier assigned by the record store.
///
/// This type never leaves the storage and page layers. Anything handed to a
/// caller goes through [`MeetupId`] first.
pub type StoreId = Uuid;

/// Canonical string form of a store identifier.
///
/// The canonical form is the lowercase hyphenated UUID. A `MeetupId` can only
/// be built from a [`StoreId`], so every value in circulation is canonical.
/// Strings coming from outside (path parameters) are checked with
/// [`MeetupId::parse_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct MeetupId(String);

impl MeetupId {
    /// Render a native store id in canonical form.
    pub fn from_store_id(id: StoreId) -> Self {
        Self(id.hyphenated().to_string())
    }

    /// Recover the native id from a caller-supplied string.
    ///
    /// Returns `None` unless `raw` is exactly the canonical rendering of some
    /// store id. Upper-case, braced, URN and simple forms are rejected so that
    /// one record never answers to two different page keys.
    pub fn parse_canonical(raw: &str) -> Option<StoreId> {
        let id = Uuid::parse_str(raw).ok()?;
        (id.hyphenated().to_string() == raw).then_some(id)
    }

    /// Borrow the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<StoreId> for MeetupId {
    fn from(id: StoreId) -> Self {
        Self::from_store_id(id)
    }
}

impl AsRef<str> for MeetupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MeetupId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a new timestamp-sortable store id.
pub fn new_store_id() -> StoreId {
    Uuid::now_v7()
}
