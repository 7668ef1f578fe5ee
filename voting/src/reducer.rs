//! Reducer logic for the voting feature.
//!
//! Every transition is total: actions that reference a missing activity, or
//! that would duplicate a vote, leave the state exactly as it was.
//!
//! `last_updated` advances if and only if the activity set changed. A fetched
//! activity list always counts as a change.

use crate::actions::VotingAction;
use crate::ingest;
use crate::types::{ActivityId, ActivityOption, ActivityPatch, NewActivity, UserId, Vote, VoteId, VotingState};
use std::sync::Arc;
use tripvote_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};
use tripvote_core::reducer::{reduce_snapshot, Reducer};
use tripvote_core::{effect::Effect, SmallVec};

/// Fresh ids drawn for a new activity before the add is given up
const MAX_ID_ATTEMPTS: usize = 8;

/// Environment dependencies for the voting reducer
#[derive(Clone)]
pub struct VotingEnvironment {
    /// Clock for vote timestamps and `last_updated`
    pub clock: Arc<dyn Clock>,
    /// Source of fresh activity and vote ids
    pub ids: Arc<dyn IdGenerator>,
}

impl VotingEnvironment {
    /// Creates a new `VotingEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random UUIDs
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }
}

impl std::fmt::Debug for VotingEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the voting feature
#[derive(Clone, Copy, Debug, Default)]
pub struct VotingReducer;

impl VotingReducer {
    /// Creates a new `VotingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn cast_vote(
        state: &mut VotingState,
        activity_id: ActivityId,
        user_id: UserId,
        env: &VotingEnvironment,
    ) -> bool {
        let Some(activity) = state.activities.iter_mut().find(|a| a.id == activity_id) else {
            tracing::debug!(%activity_id, %user_id, "Ignoring vote for unknown activity");
            return false;
        };

        if activity.vote_by(&user_id).is_some() {
            tracing::debug!(%activity_id, %user_id, "Ignoring duplicate vote");
            return false;
        }

        tracing::debug!(%activity_id, %user_id, "Vote cast");
        activity.votes.push(Vote {
            id: VoteId::from_uuid(env.ids.next_id()),
            activity_id,
            user_id,
            timestamp: env.clock.now(),
        });
        true
    }

    fn remove_vote(state: &mut VotingState, activity_id: &ActivityId, user_id: &UserId) -> bool {
        let Some(activity) = state.activities.iter_mut().find(|a| &a.id == activity_id) else {
            tracing::debug!(%activity_id, %user_id, "Ignoring vote removal for unknown activity");
            return false;
        };

        let before = activity.votes.len();
        activity.votes.retain(|vote| &vote.user_id != user_id);

        if activity.votes.len() == before {
            tracing::debug!(%activity_id, %user_id, "No vote to remove");
            return false;
        }

        tracing::debug!(%activity_id, %user_id, "Vote removed");
        true
    }

    fn add_activity(state: &mut VotingState, activity: NewActivity, env: &VotingEnvironment) -> bool {
        let fresh = (0..MAX_ID_ATTEMPTS)
            .map(|_| ActivityId::from_uuid(env.ids.next_id()))
            .find(|candidate| {
                let taken = state.activity(candidate).is_some();
                if taken {
                    tracing::warn!(activity_id = %candidate, "Generated activity id already in use");
                }
                !taken
            });

        let Some(id) = fresh else {
            tracing::error!(
                name = %activity.name,
                attempts = MAX_ID_ATTEMPTS,
                "Ignoring new activity: no unused id"
            );
            return false;
        };

        tracing::debug!(activity_id = %id, name = %activity.name, "Activity added");
        state.activities.push(ActivityOption::new(id, activity));
        true
    }

    fn update_activity(state: &mut VotingState, id: &ActivityId, patch: ActivityPatch) -> bool {
        let Some(activity) = state.activities.iter_mut().find(|a| &a.id == id) else {
            tracing::debug!(activity_id = %id, "Ignoring update for unknown activity");
            return false;
        };

        let mut before = activity.clone();
        patch.apply_to(activity);

        // Costs compare by bit pattern so a NaN cost matches itself.
        let cost = std::mem::take(&mut activity.estimated_cost);
        let cost_changed = cost.to_bits() != before.estimated_cost.to_bits();
        before.estimated_cost = 0.0;
        let changed = cost_changed || *activity != before;
        activity.estimated_cost = cost;

        tracing::debug!(activity_id = %id, changed, "Activity updated");
        changed
    }

    fn delete_activity(state: &mut VotingState, id: &ActivityId) -> bool {
        let before = state.activities.len();
        state.activities.retain(|activity| &activity.id != id);

        if state.activities.len() == before {
            tracing::debug!(activity_id = %id, "Ignoring delete for unknown activity");
            return false;
        }

        tracing::debug!(activity_id = %id, "Activity deleted");
        true
    }
}

impl Reducer for VotingReducer {
    type State = VotingState;
    type Action = VotingAction;
    type Environment = VotingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let activities_changed = match action {
            VotingAction::CastVote {
                activity_id,
                user_id,
            } => Self::cast_vote(state, activity_id, user_id, env),

            VotingAction::RemoveVote {
                activity_id,
                user_id,
            } => Self::remove_vote(state, &activity_id, &user_id),

            VotingAction::AddActivityOption(activity) => Self::add_activity(state, activity, env),

            VotingAction::UpdateActivityOption { id, patch } => {
                Self::update_activity(state, &id, patch)
            },

            VotingAction::DeleteActivityOption { id } => Self::delete_activity(state, &id),

            VotingAction::SetLoading(is_loading) => {
                state.is_loading = is_loading;
                false
            },

            VotingAction::SetError(error) => {
                state.error = error;
                false
            },

            VotingAction::FetchActivitiesSucceeded(activities) => {
                state.activities = ingest::normalize_activities(activities);
                state.error = None;
                state.is_loading = false;
                tracing::debug!(count = state.activities.len(), "Activities replaced");
                true
            },

            VotingAction::FetchAttendeesSucceeded(attendees) => {
                state.attendees = ingest::dedupe_attendees(attendees);
                tracing::debug!(count = state.attendees.len(), "Attendees replaced");
                false
            },
        };

        if activities_changed {
            state.last_updated = Some(env.clock.now());
        }

        SmallVec::new()
    }
}

/// Pure snapshot transition: returns the next state, leaving `state` untouched
#[must_use]
pub fn transition(state: &VotingState, action: VotingAction, env: &VotingEnvironment) -> VotingState {
    reduce_snapshot(&VotingReducer, state, action, env).0
}
