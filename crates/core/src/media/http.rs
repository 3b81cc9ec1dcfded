//! HTTP catalog source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FetchError, MediaItem, MediaSource};

/// Default catalog endpoint.
pub const DEFAULT_API_URL: &str = "https://146.185.158.18/fake_api.php";

/// HTTP catalog source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Catalog endpoint returning a JSON array of media items.
    #[serde(default = "default_url")]
    pub url: String,
    /// Optional bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Fetches the catalog with a single GET against a fixed endpoint.
pub struct HttpMediaSource {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpMediaSource {
    /// Create a new HTTP source.
    pub fn new(config: &HttpSourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MediaSource for HttpMediaSource {
    async fn fetch_catalog(&self) -> Result<Vec<MediaItem>, FetchError> {
        debug!("Fetching catalog from {}", self.url);

        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<MediaItem> = response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        debug!("Fetched {} catalog items", items.len());
        Ok(items)
    }

    fn name(&self) -> &str {
        "http"
    }
}
