//! HTTP client for the static JSON documents behind each variant.

use std::time::Duration;

use reqwest::Client;

use crate::error::LoaderError;

/// Fetches the store-list and catalog documents.
///
/// Every request asks intermediaries not to serve a cached copy; variants
/// that need a harder guarantee add a cache-buster query parameter on top
/// (see [`with_cache_buster`]).
#[derive(Debug, Clone)]
pub struct DataClient {
    client: Client,
}

impl DataClient {
    /// Creates a `DataClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, LoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`LoaderError::Http`] on network or TLS failure.
    /// - [`LoaderError::UnexpectedStatus`] for any non-2xx response.
    /// - [`LoaderError::Deserialize`] if the body is not JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, LoaderError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| LoaderError::Deserialize {
            context: url.to_owned(),
            source,
        })
    }
}

/// A `v=<unix millis>` token, generated once per load.
#[must_use]
pub fn cache_buster_token() -> String {
    format!("v={}", chrono::Utc::now().timestamp_millis())
}

/// Append `token` to `url` as an extra query parameter.
#[must_use]
pub fn with_cache_buster(url: &str, token: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{token}")
}
