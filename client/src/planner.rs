//! The planner: the imperative shell around the application store.
//!
//! Every operation that needs I/O (HTTP, session persistence) performs it
//! here, then dispatches a plain action describing the outcome. Reducers never
//! see a future or a socket.

use crate::api::ApiClient;
use crate::callback::parse_callback;
use crate::config::ClientConfig;
use crate::error::PlannerError;
use crate::session::{clear_session, persist_session, restore_session, FileSessionStore, Session, SessionStore};
use std::sync::Arc;
use tripvote_runtime::Store;
use tripvote_voting::{
    ActivityId, AppAction, AppEnvironment, AppReducer, AppState, AuthAction, VotingAction, VotingEnvironment,
};

/// Store specialised to the application reducer
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Owns the application store, the API client and the session store
pub struct Planner {
    store: AppStore,
    api: ApiClient,
    sessions: Arc<dyn SessionStore>,
}

impl Planner {
    /// Create a planner over an initial state
    #[must_use]
    pub fn new(
        initial_state: AppState,
        environment: AppEnvironment,
        api: ApiClient,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            store: Store::new(initial_state, AppReducer::new(), environment),
            api,
            sessions,
        }
    }

    /// Planner with a file-backed session, system clock and random ids
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig, initial_state: AppState) -> Result<Self, PlannerError> {
        Ok(Self::new(
            initial_state,
            VotingEnvironment::system(),
            ApiClient::new(config)?,
            Arc::new(FileSessionStore::new(config.session_path.clone())),
        ))
    }

    /// The current immutable snapshot
    pub async fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot().await
    }

    /// The underlying store, for subscribing or shutting down
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Dispatch an action as-is
    ///
    /// # Errors
    ///
    /// Returns an error if the store has shut down
    pub async fn dispatch(&self, action: impl Into<AppAction>) -> Result<(), PlannerError> {
        self.store.send(action.into()).await?;
        Ok(())
    }

    /// Seed auth state from the persisted session
    ///
    /// Returns whether a user was restored. Either way the auth state stops
    /// loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store or the store fails
    pub async fn restore(&self) -> Result<bool, PlannerError> {
        match restore_session(self.sessions.as_ref())? {
            Some(Session { user, token }) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.dispatch(AuthAction::SetUser { user, token }).await?;
                Ok(true)
            },
            None => {
                self.dispatch(AuthAction::SetLoading(false)).await?;
                Ok(false)
            },
        }
    }

    /// Persist `session` and mark its user signed in
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted or the store fails
    pub async fn sign_in(&self, session: Session) -> Result<(), PlannerError> {
        persist_session(self.sessions.as_ref(), &session)?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.dispatch(AuthAction::SetUser {
            user: session.user,
            token: session.token,
        })
        .await
    }

    /// Sign in from the identity provider's redirect URL
    ///
    /// A malformed redirect clears any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect is malformed, or as [`Planner::sign_in`]
    pub async fn complete_sign_in(&self, callback_url: &str) -> Result<(), PlannerError> {
        match parse_callback(callback_url) {
            Ok(session) => self.sign_in(session).await,
            Err(error) => {
                tracing::warn!(%error, "Rejected sign-in callback");
                clear_session(self.sessions.as_ref())?;
                Err(error.into())
            },
        }
    }

    /// Forget the persisted session and sign out
    ///
    /// # Errors
    ///
    /// Returns an error if the session store or the store fails
    pub async fn logout(&self) -> Result<(), PlannerError> {
        clear_session(self.sessions.as_ref())?;
        tracing::info!("Signed out");
        self.dispatch(AuthAction::Logout).await
    }

    /// Fetch attendees and replace the local set
    ///
    /// A failed fetch is recorded in `voting.error` and also returned.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NotSignedIn`] without a token, or the fetch error
    pub async fn refresh_attendees(&self) -> Result<(), PlannerError> {
        let token = self
            .store
            .state(|state| state.auth.token.clone())
            .await
            .ok_or(PlannerError::NotSignedIn)?;

        self.dispatch(VotingAction::SetError(None)).await?;
        self.dispatch(VotingAction::SetLoading(true)).await?;

        let outcome = self.api.fetch_attendees(&token).await;
        let result = match outcome {
            Ok(attendees) => {
                self.dispatch(VotingAction::FetchAttendeesSucceeded(attendees)).await?;
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, "Failed to fetch attendees");
                self.dispatch(VotingAction::SetError(Some(error.to_string()))).await?;
                Err(error.into())
            },
        };

        self.dispatch(VotingAction::SetLoading(false)).await?;
        result
    }

    /// Set the signed-in user's RSVP
    ///
    /// The flag the server stored is folded into the user, dispatched and
    /// persisted. A failed update is recorded in `voting.error` and returned.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NotSignedIn`] without a user, the API error, or
    /// a persistence error
    pub async fn set_rsvp(&self, has_rsvpd: bool) -> Result<(), PlannerError> {
        let (user, token) = self
            .store
            .state(|state| state.auth.user.clone().zip(state.auth.token.clone()))
            .await
            .ok_or(PlannerError::NotSignedIn)?;

        match self.api.update_rsvp(&user.id, &token, has_rsvpd).await {
            Ok(stored) => {
                tracing::info!(user_id = %user.id, ?stored, "RSVP updated");
                self.sign_in(Session {
                    user: user.with_rsvp(stored),
                    token,
                })
                .await
            },
            Err(error) => {
                tracing::warn!(%error, "Failed to update RSVP");
                self.dispatch(VotingAction::SetError(Some(error.to_string()))).await?;
                Err(error.into())
            },
        }
    }

    /// Toggle the signed-in user's vote on an activity
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NotSignedIn`] without a user, or a store error
    pub async fn toggle_vote(&self, activity_id: ActivityId) -> Result<(), PlannerError> {
        let action = self
            .store
            .state(|state| {
                state
                    .auth
                    .user
                    .as_ref()
                    .map(|user| VotingAction::toggle_vote(&state.voting, activity_id, user.id.clone()))
            })
            .await
            .ok_or(PlannerError::NotSignedIn)?;

        self.dispatch(action).await
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("api_url", &self.api.api_url())
            .finish_non_exhaustive()
    }
}
