//! Read-only gateway to the HN item API.
//!
//! Three calls, all cancellable: the id list for a feed category, one story
//! by id, one comment by id. No caching, no retries, no timeout beyond
//! cancellation — a failure is terminal for that request and the caller
//! decides what to show.

use crate::api::types::{Category, Comment, Story};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from a single gateway call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The owning view was torn down before the request resolved.
    /// Callers must treat this as a no-op, never as a user-visible error.
    #[error("request cancelled")]
    Cancelled,
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body was not the expected JSON shape. The API answers unknown ids
    /// with a literal `null`, which lands here too.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for the expected navigate-away outcome that is swallowed
    /// rather than surfaced.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

/// Client for the public Hacker News Firebase API.
///
/// Cheap to clone: the inner `reqwest::Client` is an `Arc` and the base URL
/// is shared. One instance is built at startup and handed to every loader
/// task.
#[derive(Debug, Clone)]
pub struct HnClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl HnClient {
    /// Production endpoint. Tests point `base_url` at a mock server instead.
    pub const DEFAULT_BASE_URL: &'static str = "https://hacker-news.firebaseio.com/v0";

    pub fn new(http: reqwest::Client, base_url: impl AsRef<str>) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// Fetch the full id list for a feed category.
    ///
    /// The API has no server-side pagination; the caller slices locally.
    ///
    /// # Errors
    ///
    /// [`ApiError::Cancelled`] if `cancel` fires first; otherwise any of the
    /// network/status/decode variants.
    pub async fn list_ids(
        &self,
        category: Category,
        cancel: &CancellationToken,
    ) -> Result<Vec<u64>, ApiError> {
        let url = format!("{}/{}stories.json", self.base_url, category.as_str());
        self.get_json(&url, cancel).await
    }

    /// Fetch one story by id.
    pub async fn get_story(&self, id: u64, cancel: &CancellationToken) -> Result<Story, ApiError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        self.get_json(&url, cancel).await
    }

    /// Fetch one comment by id.
    pub async fn get_comment(
        &self,
        id: u64,
        cancel: &CancellationToken,
    ) -> Result<Comment, ApiError> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        self.get_json(&url, cancel).await
    }

    /// Issue a GET and decode the JSON body, racing the whole exchange
    /// against the cancellation token.
    ///
    /// `biased` with the token first: a call issued after teardown resolves
    /// to `Cancelled` without touching the network.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let request = async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::HttpStatus(status.as_u16()));
            }
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        };

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(url = %url, "request cancelled");
                Err(ApiError::Cancelled)
            }
            result = request => result,
        }
    }
}
