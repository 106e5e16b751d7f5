//! Jamendo public music-metadata API.
//!
//! Only used for the "Tracks" stat on the dashboard overview.

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use crate::config::JamendoConfig;

use super::{ApiError, handle_response};

/// Number of tracks requested from Jamendo.
pub const JAMENDO_TRACK_LIMIT: u32 = 10;

/// A Jamendo track (only the fields the dashboard shows).
#[derive(Debug, Clone, Deserialize)]
pub struct JamendoTrack {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: Option<String>,
}

#[derive(Deserialize)]
struct TracksEnvelope {
    #[serde(default)]
    results: Vec<JamendoTrack>,
}

/// Jamendo API client.
#[derive(Clone)]
pub struct JamendoClient {
    inner: Arc<JamendoClientInner>,
}

struct JamendoClientInner {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
}

impl JamendoClient {
    /// Create a new Jamendo client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &JamendoConfig, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(JamendoClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                client_id: config.client_id.clone(),
            }),
        })
    }

    /// Fetch a small page of public tracks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has no `results`.
    #[instrument(skip(self))]
    pub async fn sample_tracks(&self) -> Result<Vec<JamendoTrack>, ApiError> {
        let url = self.tracks_url()?;
        let response = self.inner.client.get(url).send().await?;

        let envelope: TracksEnvelope = handle_response("jamendo /tracks", response).await?;
        Ok(envelope.results)
    }

    fn tracks_url(&self) -> Result<url::Url, ApiError> {
        let limit = JAMENDO_TRACK_LIMIT.to_string();
        url::Url::parse_with_params(
            &format!("{}/tracks/", self.inner.base_url),
            &[
                ("client_id", self.inner.client_id.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| ApiError::Decode {
            endpoint: "jamendo /tracks".to_string(),
            message: format!("invalid URL: {e}"),
        })
    }
}

impl std::fmt::Debug for JamendoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JamendoClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
