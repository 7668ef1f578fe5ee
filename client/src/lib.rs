//! Everything around the pure voting core that touches the outside world.
//!
//! - [`config`]: where the API lives and where the session is kept
//! - [`api`]: the REST client for attendees and RSVPs
//! - [`session`]: the persisted sign-in session
//! - [`callback`]: the identity provider's redirect
//! - [`planner`]: the shell that performs I/O and dispatches the outcome
//!
//! # Example
//!
//! ```no_run
//! use tripvote_client::{ClientConfig, Planner};
//! use tripvote_voting::AppState;
//!
//! # async fn example() -> Result<(), tripvote_client::PlannerError> {
//! let planner = Planner::from_config(&ClientConfig::from_env(), AppState::default())?;
//!
//! if planner.restore().await? {
//!     planner.refresh_attendees().await?;
//!     planner.set_rsvp(true).await?;
//! }
//!
//! let state = planner.snapshot().await;
//! println!("{} attendees", state.voting.attendees.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod callback;
pub mod config;
pub mod error;
pub mod planner;
pub mod session;

pub use api::ApiClient;
pub use callback::parse_callback;
pub use config::ClientConfig;
pub use error::{ApiError, CallbackError, PlannerError, SessionError};
pub use planner::{AppStore, Planner};
pub use session::{
    clear_session, persist_session, restore_session, FileSessionStore, MemorySessionStore, Session, SessionStore,
};
