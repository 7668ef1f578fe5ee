//! Client configuration.
//!
//! Values come from the environment where set, with local-development
//! defaults otherwise.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::api_url`]
pub const API_URL_VAR: &str = "TRIPVOTE_API_URL";
/// Environment variable overriding [`ClientConfig::session_path`]
pub const SESSION_PATH_VAR: &str = "TRIPVOTE_SESSION_PATH";
/// Environment variable overriding [`ClientConfig::request_timeout`], in seconds
pub const REQUEST_TIMEOUT_VAR: &str = "TRIPVOTE_REQUEST_TIMEOUT_SECS";

/// Configuration for the remote API and session persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the remote API, without trailing slash.
    ///
    /// Default: `http://localhost:8000`
    pub api_url: String,

    /// File holding the persisted session.
    ///
    /// Default: `.tripvote/session.json`
    pub session_path: PathBuf,

    /// Timeout applied to every HTTP request.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given API base URL.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `TRIPVOTE_*` environment variables.
    ///
    /// An unparsable timeout is ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(api_url) = lookup(API_URL_VAR) {
            config = config.with_api_url(api_url);
        }

        if let Some(path) = lookup(SESSION_PATH_VAR) {
            config = config.with_session_path(path);
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            match raw.parse::<u64>() {
                Ok(secs) => config = config.with_request_timeout(Duration::from_secs(secs)),
                Err(error) => {
                    tracing::warn!(value = %raw, %error, "Ignoring invalid {REQUEST_TIMEOUT_VAR}");
                },
            }
        }

        config
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the session file location.
    #[must_use]
    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            session_path: PathBuf::from(".tripvote/session.json"),
            request_timeout: Duration::from_secs(10),
        }
    }
}
