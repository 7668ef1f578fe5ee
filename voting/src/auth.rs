//! Authentication state.
//!
//! Tracks who is signed in and whether the persisted session has been
//! restored yet. The reducer only records outcomes; sign-in itself happens
//! outside (see the client's callback handling).

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use tripvote_core::{effect::Effect, reducer::Reducer, SmallVec};

/// The signed-in user as returned by the sign-in callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// RSVP flag; `None` while pending
    #[serde(rename = "hasRSVPd", default, skip_serializing_if = "Option::is_none")]
    pub has_rsvpd: Option<bool>,
}

impl User {
    /// Copy of this user with the RSVP flag replaced
    #[must_use]
    pub fn with_rsvp(&self, has_rsvpd: Option<bool>) -> Self {
        Self {
            has_rsvpd,
            ..self.clone()
        }
    }
}

/// Authentication state
#[derive(Clone, PartialEq, Eq)]
pub struct AuthState {
    /// Signed-in user
    pub user: Option<User>,
    /// Bearer token for the remote API
    pub token: Option<String>,
    /// Whether a user is signed in
    pub is_authenticated: bool,
    /// True until the persisted session has been checked
    pub is_loading: bool,
}

impl AuthState {
    /// Unauthenticated, waiting for session restore
    #[must_use]
    pub const fn new() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_authenticated", &self.is_authenticated)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// Authentication actions
#[derive(Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// A user signed in (or a session was restored)
    SetUser {
        /// The user
        user: User,
        /// Their bearer token
        token: String,
    },
    /// Forget the current user
    Logout,
    /// Overwrite the loading flag
    SetLoading(bool),
}

impl std::fmt::Debug for AuthAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetUser { user, .. } => f
                .debug_struct("SetUser")
                .field("user", user)
                .field("token", &"<redacted>")
                .finish(),
            Self::Logout => f.write_str("Logout"),
            Self::SetLoading(loading) => f.debug_tuple("SetLoading").field(loading).finish(),
        }
    }
}

/// Reducer for [`AuthState`]
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::SetUser { user, token } => {
                tracing::debug!(user_id = %user.id, "User signed in");
                state.user = Some(user);
                state.token = Some(token);
                state.is_authenticated = true;
                state.is_loading = false;
            },
            AuthAction::Logout => {
                tracing::debug!("User signed out");
                state.user = None;
                state.token = None;
                state.is_authenticated = false;
                state.is_loading = false;
            },
            AuthAction::SetLoading(is_loading) => {
                state.is_loading = is_loading;
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use tripvote_testing::{assertions, ReducerTest};

    fn mike() -> User {
        User {
            id: UserId::from("u1"),
            email: "mike@example.com".to_string(),
            name: "Mike".to_string(),
            picture: None,
            has_rsvpd: None,
        }
    }

    fn signed_in() -> AuthState {
        AuthState {
            user: Some(mike()),
            token: Some("t0k".to_string()),
            is_authenticated: true,
            is_loading: false,
        }
    }

    #[test]
    fn initial_state_is_loading() {
        let state = AuthState::default();
        assert!(state.is_loading);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn set_user_authenticates() {
        ReducerTest::new(AuthReducer::new())
            .with_env(())
            .given_state(AuthState::new())
            .when_action(AuthAction::SetUser {
                user: mike(),
                token: "t0k".to_string(),
            })
            .then_state_eq(signed_in())
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn logout_clears_user_and_token() {
        ReducerTest::new(AuthReducer::new())
            .with_env(())
            .given_state(signed_in())
            .when_action(AuthAction::Logout)
            .then_state(|state| {
                assert!(state.user.is_none());
                assert!(state.token.is_none());
                assert!(!state.is_authenticated);
                assert!(!state.is_loading);
            })
            .run();
    }

    #[test]
    fn set_loading_only_touches_flag() {
        ReducerTest::new(AuthReducer::new())
            .with_env(())
            .given_state(signed_in())
            .when_action(AuthAction::SetLoading(true))
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(state.is_authenticated);
                assert_eq!(state.user, Some(mike()));
            })
            .run();
    }

    #[test]
    fn with_rsvp_folds_flag_into_copy() {
        let user = mike();
        let updated = user.with_rsvp(Some(true));

        assert_eq!(updated.has_rsvpd, Some(true));
        assert_eq!(user.has_rsvpd, None);
        assert_eq!(updated.name, user.name);
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let rendered = format!(
            "{:?} {:?}",
            signed_in(),
            AuthAction::SetUser {
                user: mike(),
                token: "t0k".to_string(),
            }
        );
        assert!(!rendered.contains("t0k"));
    }

    #[test]
    fn user_wire_format() {
        let json = r#"{"id":"u1","email":"mike@example.com","name":"Mike","hasRSVPd":false}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.has_rsvpd, Some(false));
        assert_eq!(serde_json::to_string(&user).unwrap(), json);
    }
}
