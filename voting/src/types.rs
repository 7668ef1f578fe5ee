//! Domain types for activity voting.
//!
//! An event has a set of proposed [`ActivityOption`]s, each owning the
//! [`Vote`]s cast for it, and a set of [`Attendee`]s fetched from the remote
//! API. [`VotingState`] is the aggregate root the voting reducer evolves.
//!
//! All types serialise with camelCase keys so they match the remote API's JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier rendered from a generated UUID
            #[must_use]
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id.to_string())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an activity option
    ActivityId
);

string_id!(
    /// Unique identifier for a vote
    VoteId
);

string_id!(
    /// Identifier of a user (attendee or signed-in account)
    UserId
);

// ═══════════════════════════════════════════════════════════════════════
// Votes and activities
// ═══════════════════════════════════════════════════════════════════════

/// One user's endorsement of one activity option
///
/// Votes are immutable once created. At most one vote per
/// (`activity_id`, `user_id`) pair exists in a [`VotingState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Unique identifier
    pub id: VoteId,
    /// Activity this vote belongs to
    pub activity_id: ActivityId,
    /// The voter
    pub user_id: UserId,
    /// When the vote was cast (epoch milliseconds on the wire)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Kind of activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Meals, drinks, restaurants
    Food,
    /// Outings and events
    #[default]
    Entertainment,
    /// Getting around
    Transportation,
    /// Places to stay
    Accommodation,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Food => "food",
            Self::Entertainment => "entertainment",
            Self::Transportation => "transportation",
            Self::Accommodation => "accommodation",
        };
        f.write_str(name)
    }
}

/// A proposed activity attendees vote on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOption {
    /// Unique identifier
    pub id: ActivityId,
    /// Display name
    pub name: String,
    /// Free-form description (location, date, time)
    pub description: String,
    /// Estimated cost per person, non-negative
    pub estimated_cost: f64,
    /// Kind of activity
    pub category: Category,
    /// Votes in the order they were cast
    #[serde(default)]
    pub votes: Vec<Vote>,
    /// Whether the option is still open
    pub is_active: bool,
}

static EMPTY_ACTIVITY: ActivityOption = ActivityOption {
    id: ActivityId(String::new()),
    name: String::new(),
    description: String::new(),
    estimated_cost: 0.0,
    category: Category::Entertainment,
    votes: Vec::new(),
    is_active: false,
};

impl ActivityOption {
    /// Creates an active option with no votes
    #[must_use]
    pub fn new(id: ActivityId, activity: NewActivity) -> Self {
        Self {
            id,
            name: activity.name,
            description: activity.description,
            estimated_cost: activity.estimated_cost,
            category: activity.category,
            votes: Vec::new(),
            is_active: true,
        }
    }

    /// The empty sentinel: empty id and name, no votes, inactive
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY_ACTIVITY
    }

    /// Whether this is the [`ActivityOption::empty`] sentinel
    #[must_use]
    pub fn is_empty_sentinel(&self) -> bool {
        self.id.as_str().is_empty() && self.votes.is_empty()
    }

    /// The vote `user_id` cast for this activity, if any
    #[must_use]
    pub fn vote_by(&self, user_id: &UserId) -> Option<&Vote> {
        self.votes.iter().find(|vote| &vote.user_id == user_id)
    }
}

/// Fields supplied when proposing a new activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Estimated cost per person
    pub estimated_cost: f64,
    /// Kind of activity
    pub category: Category,
}

impl NewActivity {
    /// Creates a proposal with an empty description and no cost
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            estimated_cost: 0.0,
            category,
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the estimated cost
    #[must_use]
    pub const fn with_cost(mut self, estimated_cost: f64) -> Self {
        self.estimated_cost = estimated_cost;
        self
    }
}

/// Partial update of an activity option
///
/// `None` fields are left untouched. The id and the votes cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New estimated cost
    pub estimated_cost: Option<f64>,
    /// New category
    pub category: Option<Category>,
    /// Open or close the option
    pub is_active: Option<bool>,
}

impl ActivityPatch {
    /// Merges the supplied fields into `activity`
    pub fn apply_to(self, activity: &mut ActivityOption) {
        if let Some(name) = self.name {
            activity.name = name;
        }
        if let Some(description) = self.description {
            activity.description = description;
        }
        if let Some(estimated_cost) = self.estimated_cost {
            activity.estimated_cost = estimated_cost;
        }
        if let Some(category) = self.category {
            activity.category = category;
        }
        if let Some(is_active) = self.is_active {
            activity.is_active = is_active;
        }
    }

    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.estimated_cost.is_none()
            && self.category.is_none()
            && self.is_active.is_none()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Attendees
// ═══════════════════════════════════════════════════════════════════════

/// An attendee's response to the overall event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RsvpStatus {
    /// Confirmed attending
    Yes,
    /// Confirmed not attending
    No,
    /// No answer yet
    Pending,
}

impl From<Option<bool>> for RsvpStatus {
    fn from(has_rsvpd: Option<bool>) -> Self {
        match has_rsvpd {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Pending,
        }
    }
}

/// A party participant, as supplied by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Unique identifier
    pub id: UserId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Display name
    pub full_name: String,
    /// Contact address
    pub email: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// RSVP answer; absent or null means pending
    #[serde(rename = "hasRSVPd", default)]
    pub has_rsvpd: Option<bool>,
}

impl Attendee {
    /// Three-valued RSVP state
    #[must_use]
    pub fn rsvp(&self) -> RsvpStatus {
        self.has_rsvpd.into()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Aggregate root
// ═══════════════════════════════════════════════════════════════════════

/// State of the voting feature
///
/// Only ever changed through the voting reducer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    /// Proposed activities, unique by id, in proposal order
    pub activities: Vec<ActivityOption>,
    /// Participants, unique by id
    pub attendees: Vec<Attendee>,
    /// Whether a fetch is in flight
    pub is_loading: bool,
    /// Last error reported by the calling layer
    pub error: Option<String>,
    /// When the activity set last changed
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl VotingState {
    /// Creates an empty state, pending a fetch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            activities: Vec::new(),
            attendees: Vec::new(),
            is_loading: false,
            error: None,
            last_updated: None,
        }
    }

    /// Creates a state from a seed set
    ///
    /// The seed goes through the same normalisation as fetched data: duplicate
    /// ids and duplicate votes are dropped, vote ownership is repaired.
    #[must_use]
    pub fn with_seed(activities: Vec<ActivityOption>, attendees: Vec<Attendee>) -> Self {
        Self {
            activities: crate::ingest::normalize_activities(activities),
            attendees: crate::ingest::dedupe_attendees(attendees),
            ..Self::new()
        }
    }

    /// Returns an activity by ID
    #[must_use]
    pub fn activity(&self, id: &ActivityId) -> Option<&ActivityOption> {
        self.activities.iter().find(|activity| &activity.id == id)
    }

    /// Returns an attendee by ID
    #[must_use]
    pub fn attendee(&self, id: &UserId) -> Option<&Attendee> {
        self.attendees.iter().find(|attendee| &attendee.id == id)
    }

    /// Whether `user_id` has voted for `activity_id`
    #[must_use]
    pub fn has_vote(&self, activity_id: &ActivityId, user_id: &UserId) -> bool {
        self.activity(activity_id)
            .is_some_and(|activity| activity.vote_by(user_id).is_some())
    }
}
