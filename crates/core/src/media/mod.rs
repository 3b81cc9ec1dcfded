//! Media catalog model and the fetch capability that produces it.
//!
//! The poll scheduler only knows about the [`MediaSource`] trait; the HTTP
//! implementation lives in [`HttpMediaSource`], test doubles in
//! [`crate::testing`].

mod http;
mod types;

pub use http::{HttpMediaSource, HttpSourceConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching the catalog.
///
/// The scheduler treats every variant the same way (fail-fast), the
/// distinction only matters for logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog endpoint returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    /// Source cannot serve requests right now.
    #[error("Catalog source unavailable: {0}")]
    Unavailable(String),
}

/// Capability that fetches the complete remote catalog.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fetch the current catalog.
    async fn fetch_catalog(&self) -> Result<Vec<MediaItem>, FetchError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
