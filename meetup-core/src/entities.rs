//! Meetup records and the view-models projected from them

use serde::{Deserialize, Serialize};

use crate::identity::{MeetupId, StoreId};

/// Business fields of a meetup as submitted by a client.
///
/// This is also the exact shape persisted in the document store; the store
/// adds only its own identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewMeetup {
    /// Display title
    pub title: String,
    /// Street address or venue
    pub address: String,
    /// Image reference (URL)
    pub image: String,
    /// Free-form description
    pub description: String,
}

/// A stored meetup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetupDocument {
    /// Store-assigned identifier (native type)
    pub id: StoreId,
    pub title: String,
    pub address: String,
    pub image: String,
    pub description: String,
}

impl MeetupDocument {
    /// Attach a store id to submitted fields.
    pub fn from_parts(id: StoreId, fields: NewMeetup) -> Self {
        Self {
            id,
            title: fields.title,
            address: fields.address,
            image: fields.image,
            description: fields.description,
        }
    }

    /// Canonical string id for this document.
    pub fn meetup_id(&self) -> MeetupId {
        MeetupId::from_store_id(self.id)
    }

    /// Project into the list view-model. The description is dropped.
    pub fn to_summary(&self) -> MeetupSummary {
        MeetupSummary {
            title: self.title.clone(),
            address: self.address.clone(),
            image: self.image.clone(),
            id: self.meetup_id(),
        }
    }

    /// Project into the detail view-model.
    pub fn into_detail(self) -> MeetupDetail {
        let id = self.meetup_id();
        MeetupDetail {
            title: self.title,
            address: self.address,
            image: self.image,
            description: self.description,
            id,
        }
    }
}

/// One entry of the list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MeetupSummary {
    pub title: String,
    pub address: String,
    pub image: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: MeetupId,
}

/// The detail page of a single meetup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MeetupDetail {
    pub title: String,
    pub address: String,
    pub image: String,
    pub description: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub id: MeetupId,
}
