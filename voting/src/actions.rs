//! Actions accepted by the voting reducer.

use crate::types::{ActivityId, ActivityOption, ActivityPatch, Attendee, NewActivity, UserId, VotingState};

/// Every transition of [`VotingState`]
///
/// The set is closed: the reducer matches it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum VotingAction {
    /// Add `user_id`'s vote to an activity, unless it is already there
    CastVote {
        /// Activity voted for
        activity_id: ActivityId,
        /// The voter
        user_id: UserId,
    },

    /// Withdraw `user_id`'s vote from an activity
    RemoveVote {
        /// Activity the vote belongs to
        activity_id: ActivityId,
        /// The voter
        user_id: UserId,
    },

    /// Propose a new activity
    AddActivityOption(NewActivity),

    /// Merge fields into an existing activity
    UpdateActivityOption {
        /// Activity to update
        id: ActivityId,
        /// Fields to overwrite
        patch: ActivityPatch,
    },

    /// Remove an activity and its votes
    DeleteActivityOption {
        /// Activity to delete
        id: ActivityId,
    },

    /// A fetch started or finished
    SetLoading(bool),

    /// The calling layer reports (or clears) an error
    SetError(Option<String>),

    /// The remote activity list arrived; replaces the whole set
    FetchActivitiesSucceeded(Vec<ActivityOption>),

    /// The remote attendee list arrived; replaces the whole set
    FetchAttendeesSucceeded(Vec<Attendee>),
}

impl VotingAction {
    /// `CastVote` for the given activity and user
    #[must_use]
    pub fn cast_vote(activity_id: impl Into<ActivityId>, user_id: impl Into<UserId>) -> Self {
        Self::CastVote {
            activity_id: activity_id.into(),
            user_id: user_id.into(),
        }
    }

    /// `RemoveVote` for the given activity and user
    #[must_use]
    pub fn remove_vote(activity_id: impl Into<ActivityId>, user_id: impl Into<UserId>) -> Self {
        Self::RemoveVote {
            activity_id: activity_id.into(),
            user_id: user_id.into(),
        }
    }

    /// `RemoveVote` if the user already voted for the activity, `CastVote` otherwise
    #[must_use]
    pub fn toggle_vote(state: &VotingState, activity_id: ActivityId, user_id: UserId) -> Self {
        if state.has_vote(&activity_id, &user_id) {
            Self::RemoveVote {
                activity_id,
                user_id,
            }
        } else {
            Self::CastVote {
                activity_id,
                user_id,
            }
        }
    }
}
