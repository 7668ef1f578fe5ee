//! Remote API client

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tripvote_voting::{Attendee, UserId};

/// Body of an RSVP update, sent and received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpUpdate {
    /// New RSVP flag; the server may answer `null`
    #[serde(rename = "hasRSVPd")]
    pub has_rsvpd: Option<bool>,
}

/// Client for the tripvote REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot be initialised
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch every attendee of the trip
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// undecodable bodies
    #[tracing::instrument(skip(self, token))]
    pub async fn fetch_attendees(&self, token: &str) -> Result<Vec<Attendee>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/v1/users", self.api_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let attendees: Vec<Attendee> = Self::decode(response).await?;
        tracing::debug!(count = attendees.len(), "Fetched attendees");
        Ok(attendees)
    }

    /// Set a user's RSVP flag, returning the value the server stored
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// undecodable bodies
    #[tracing::instrument(skip(self, token))]
    pub async fn update_rsvp(
        &self,
        user_id: &UserId,
        token: &str,
        has_rsvpd: bool,
    ) -> Result<Option<bool>, ApiError> {
        let response = self
            .client
            .put(format!("{}/api/v1/users/{}/rsvp", self.api_url, user_id))
            .bearer_auth(token)
            .json(&RsvpUpdate {
                has_rsvpd: Some(has_rsvpd),
            })
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let stored: RsvpUpdate = Self::decode(response).await?;
        tracing::debug!(stored = ?stored.has_rsvpd, "RSVP updated");
        Ok(stored.has_rsvpd)
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsvp_body_uses_api_key() {
        let body = serde_json::to_string(&RsvpUpdate {
            has_rsvpd: Some(true),
        });
        assert_eq!(body.ok().as_deref(), Some(r#"{"hasRSVPd":true}"#));
    }

    #[test]
    fn client_keeps_configured_url() {
        let client = ApiClient::new(&ClientConfig::new("http://api.local/"));
        assert_eq!(client.ok().as_ref().map(ApiClient::api_url), Some("http://api.local"));
    }
}
