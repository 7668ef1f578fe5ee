//! Application-wide state: voting and authentication side by side.

use crate::actions::VotingAction;
use crate::auth::{AuthAction, AuthReducer, AuthState};
use crate::reducer::{VotingEnvironment, VotingReducer};
use crate::types::VotingState;
use tripvote_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use tripvote_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Environment of the application reducer
pub type AppEnvironment = VotingEnvironment;

/// Root state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Activities, votes and attendees
    pub voting: VotingState,
    /// Signed-in user
    pub auth: AuthState,
}

/// Root action
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Routed to the voting reducer
    Voting(VotingAction),
    /// Routed to the auth reducer
    Auth(AuthAction),
}

impl From<VotingAction> for AppAction {
    fn from(action: VotingAction) -> Self {
        Self::Voting(action)
    }
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

/// Routes each [`AppAction`] to the child reducer owning its slice of state
pub struct AppReducer {
    inner: CombinedReducer<AppState, AppAction, AppEnvironment>,
}

impl AppReducer {
    /// Creates the combined reducer
    #[must_use]
    pub fn new() -> Self {
        let inner = combine_reducers(vec![
            Box::new(scope_reducer(
                VotingReducer::new(),
                |state: &mut AppState| &mut state.voting,
                |action: AppAction| match action {
                    AppAction::Voting(action) => Some(action),
                    AppAction::Auth(_) => None,
                },
                AppAction::Voting,
                |env: &AppEnvironment| env,
            )),
            Box::new(scope_reducer(
                AuthReducer::new(),
                |state: &mut AppState| &mut state.auth,
                |action: AppAction| match action {
                    AppAction::Auth(action) => Some(action),
                    AppAction::Voting(_) => None,
                },
                AppAction::Auth,
                |_: &AppEnvironment| &(),
            )),
        ]);

        Self { inner }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer").finish_non_exhaustive()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use crate::types::{ActivityId, Category, NewActivity, UserId};
    use std::sync::Arc;
    use tripvote_testing::{assertions, test_clock, ReducerTest, SequentialIdGenerator};

    fn env() -> AppEnvironment {
        VotingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()))
    }

    #[test]
    fn voting_actions_only_touch_voting_slice() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::from(VotingAction::AddActivityOption(NewActivity::new(
                "BBQ Dinner",
                Category::Food,
            ))))
            .then_state(|state| {
                assert_eq!(state.voting.activities.len(), 1);
                assert_eq!(state.auth, AuthState::default());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn auth_actions_only_touch_auth_slice() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(AppAction::from(AuthAction::SetUser {
                user: User {
                    id: UserId::from("u1"),
                    email: "mike@example.com".to_string(),
                    name: "Mike".to_string(),
                    picture: None,
                    has_rsvpd: None,
                },
                token: "t0k".to_string(),
            }))
            .then_state(|state| {
                assert!(state.auth.is_authenticated);
                assert_eq!(state.voting, VotingState::default());
            })
            .run();
    }

    #[test]
    fn signed_in_user_can_vote() {
        ReducerTest::new(AppReducer::new())
            .with_env(env())
            .given_state(AppState::default())
            .when_action(VotingAction::AddActivityOption(NewActivity::new("Go Kart Racing", Category::Entertainment)).into())
            .when_action(VotingAction::cast_vote(ActivityId::from_uuid(uuid::Uuid::from_u128(1)), "u1").into())
            .then_state(|state| {
                assert_eq!(state.voting.activities[0].votes.len(), 1);
            })
            .run();
    }
}
