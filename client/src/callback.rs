//! Sign-in redirect handling.
//!
//! After authenticating, the identity provider redirects to
//! `/auth/callback?token=...&user=...` where `user` is the URL-encoded JSON of
//! the signed-in [`User`].

use crate::error::CallbackError;
use crate::session::Session;
use reqwest::Url;
use tripvote_voting::User;

/// Extract the session carried by a sign-in redirect URL
///
/// # Errors
///
/// Returns [`CallbackError`] if the URL does not parse, `token` or `user` is
/// missing or empty, or `user` is not a valid user object
pub fn parse_callback(url: &str) -> Result<Session, CallbackError> {
    let url = Url::parse(url).map_err(|e| CallbackError::InvalidUrl(e.to_string()))?;

    let mut token = None;
    let mut user = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" if token.is_none() => token = Some(value.into_owned()),
            "user" if user.is_none() => user = Some(value.into_owned()),
            _ => {},
        }
    }

    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(CallbackError::MissingParameter("token"))?;
    let user = user
        .filter(|u| !u.is_empty())
        .ok_or(CallbackError::MissingParameter("user"))?;

    let user: User =
        serde_json::from_str(&user).map_err(|e| CallbackError::InvalidUser(e.to_string()))?;

    tracing::debug!(user_id = %user.id, "Parsed sign-in callback");
    Ok(Session { user, token })
}
