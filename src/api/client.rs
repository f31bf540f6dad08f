//! HTTP client for fetching leaderboard data and site resources.
//!
//! This module provides the `ApiClient` struct for the two kinds of
//! requests the viewer makes: the runs.json data document, and raw
//! site-shell resources for the offline gateway.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::models::{RunRecord, RunsDocument};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow hosts while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the leaderboard data source.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a new client with the default timeout
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Fetch the runs document and return its flat record list.
    ///
    /// Single unauthenticated GET; failures are terminal for the request,
    /// there is no retry.
    pub async fn fetch_runs(&self, url: &str) -> Result<Vec<RunRecord>> {
        debug!(url, "Fetching runs document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let document: RunsDocument = response
            .json()
            .await
            .with_context(|| format!("Failed to parse runs document from {}", url))?;

        debug!(count = document.runs.len(), "Runs document fetched");
        Ok(document.runs)
    }

    /// Fetch a raw resource and return its body bytes.
    ///
    /// Used by the offline gateway both to pre-populate its cache and to
    /// fall through to the network on a cache miss.
    pub async fn fetch_resource(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Fetching resource");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read resource body from {}", url))?;

        Ok(bytes.to_vec())
    }
}
