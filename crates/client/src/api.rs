//! REST client for the `/tracks` endpoints.
//!
//! Thin [`reqwest`] wrapper: one method per endpoint, no caching, no retries.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracklist_core::track::{Track, TrackInput};
use tracklist_core::types::DbId;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// HTTP client for the tracks API.
pub struct TrackApi {
    client: reqwest::Client,
    base_url: String,
}

/// Error envelope returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl TrackApi {
    /// * `base_url` - API root, e.g. `http://127.0.0.1:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /tracks`
    pub async fn list_tracks(&self) -> Result<Vec<Track>, ClientError> {
        let response = self.client.get(self.url("/tracks")).send().await?;
        Self::parse_response(response).await
    }

    /// `POST /tracks`
    pub async fn create_track(&self, input: &TrackInput) -> Result<Track, ClientError> {
        let response = self
            .client
            .post(self.url("/tracks"))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `PUT /tracks/{id}`
    pub async fn update_track(&self, id: DbId, input: &TrackInput) -> Result<Track, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/tracks/{id}")))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// `DELETE /tracks/{id}`
    pub async fn delete_track(&self, id: DbId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/tracks/{id}")))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`ClientError::Api`] carrying the server's `error` message verbatim.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
