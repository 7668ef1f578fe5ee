//! Error types for the tripvote client

use thiserror::Error;
use tripvote_runtime::StoreError;

/// Errors that can occur when talking to the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Unauthorized - missing or expired token
    #[error("Unauthorized - sign in again")]
    Unauthorized,

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

/// Errors from the persisted session store
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed
    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Session data could not be encoded as JSON
    #[error("Session data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from the sign-in redirect
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback URL could not be parsed
    #[error("Invalid callback URL: {0}")]
    InvalidUrl(String),

    /// A required query parameter is absent or empty
    #[error("Missing `{0}` parameter in callback URL")]
    MissingParameter(&'static str),

    /// The `user` parameter is not a valid user object
    #[error("Invalid user data in callback URL: {0}")]
    InvalidUser(String),
}

/// Errors surfaced by [`Planner`](crate::Planner) operations
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The operation needs a signed-in user
    #[error("Not signed in")]
    NotSignedIn,

    /// Remote API failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session persistence failure
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Malformed sign-in redirect
    #[error(transparent)]
    Callback(#[from] CallbackError),

    /// The store no longer accepts actions
    #[error(transparent)]
    Store(#[from] StoreError),
}
