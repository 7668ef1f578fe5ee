//! Activity voting for a group trip.
//!
//! Attendees propose activities and vote on them. This crate holds the
//! in-memory model and the pure rules that evolve it:
//!
//! - [`types`]: activities, votes, attendees and the [`VotingState`] aggregate
//! - [`reducer`]: the [`VotingReducer`] and its snapshot form [`transition`]
//! - [`stats`]: read-only figures derived from a state
//! - [`auth`]: who is signed in
//! - [`app`]: both reducers combined into one application reducer
//!
//! Nothing here performs I/O. Fetching and persistence live in
//! `tripvote-client`, which dispatches the outcomes as plain actions.
//!
//! # Quick Start
//!
//! ```
//! use tripvote_voting::{transition, Category, NewActivity, VotingAction, VotingEnvironment, VotingState};
//!
//! let env = VotingEnvironment::system();
//! let state = VotingState::new();
//!
//! let state = transition(
//!     &state,
//!     VotingAction::AddActivityOption(NewActivity::new("Brewery Tour", Category::Food)),
//!     &env,
//! );
//! let id = state.activities[0].id.clone();
//!
//! let state = transition(&state, VotingAction::cast_vote(id.clone(), "user-1"), &env);
//! assert!(state.has_vote(&id, &"user-1".into()));
//! ```

pub mod actions;
pub mod app;
pub mod auth;
pub mod ingest;
pub mod reducer;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use actions::VotingAction;
pub use app::{AppAction, AppEnvironment, AppReducer, AppState};
pub use auth::{AuthAction, AuthReducer, AuthState, User};
pub use reducer::{transition, VotingEnvironment, VotingReducer};
pub use stats::{RsvpSummary, VotingStats};
pub use types::{
    ActivityId, ActivityOption, ActivityPatch, Attendee, Category, NewActivity, RsvpStatus, UserId, Vote,
    VoteId, VotingState,
};
