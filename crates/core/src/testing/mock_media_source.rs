//! Mock catalog source for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::media::{FetchError, MediaItem, MediaSource};

/// Mock implementation of the MediaSource trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable catalog
/// - Count fetches for assertions
/// - Simulate failures and slow responses
pub struct MockMediaSource {
    /// Catalog returned by successful fetches.
    catalog: RwLock<Vec<MediaItem>>,
    /// If set, the next fetch will fail with this error.
    next_error: RwLock<Option<FetchError>>,
    /// If set, every fetch fails with this message.
    always_fail: RwLock<Option<String>>,
    /// Simulated response time.
    delay: RwLock<Duration>,
    fetches: AtomicUsize,
}

impl std::fmt::Debug for MockMediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockMediaSource")
            .field("fetches", &self.fetches.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl Default for MockMediaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaSource {
    /// Create a source returning an empty catalog.
    pub fn new() -> Self {
        Self::with_catalog(Vec::new())
    }

    pub fn with_catalog(items: Vec<MediaItem>) -> Self {
        Self {
            catalog: RwLock::new(items),
            next_error: RwLock::new(None),
            always_fail: RwLock::new(None),
            delay: RwLock::new(Duration::ZERO),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the catalog returned by later fetches.
    pub async fn set_catalog(&self, items: Vec<MediaItem>) {
        *self.catalog.write().await = items;
    }

    /// Fail the next fetch with `error`.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Fail every fetch until cleared with `None`.
    pub async fn set_always_fail(&self, message: Option<String>) {
        *self.always_fail.write().await = message;
    }

    /// Make each fetch take `delay` before it resolves.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Number of fetches started so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn fetch_catalog(&self) -> Result<Vec<MediaItem>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        // Outcome is decided when the request goes out
        let error = match self.next_error.write().await.take() {
            Some(error) => Some(error),
            None => self
                .always_fail
                .read()
                .await
                .clone()
                .map(FetchError::Unavailable),
        };
        let items = self.catalog.read().await.clone();

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match error {
            Some(error) => Err(error),
            None => Ok(items),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
