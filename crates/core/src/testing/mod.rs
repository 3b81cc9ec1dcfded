//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external capability
//! traits ([`MediaSource`](crate::media::MediaSource) and
//! [`KeyValueStore`](crate::storage::KeyValueStore)), allowing the whole
//! client to be exercised without a network or a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use medialist_core::testing::{fixtures, MockKeyValueStore, MockMediaSource};
//!
//! let source = MockMediaSource::with_catalog(fixtures::mixed_catalog());
//! let store = MockKeyValueStore::new();
//!
//! // Fail the next fetch
//! source.set_next_error(FetchError::Unavailable("down".into())).await;
//!
//! // Use in MediaListApp...
//! ```

mod mock_media_source;
mod mock_store;

pub use mock_media_source::MockMediaSource;
pub use mock_store::MockKeyValueStore;

/// Let spawned tasks run until they block again.
///
/// Pair with `tokio::time::advance` on a paused clock to step the poll
/// timer deterministically.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::media::{MediaItem, MediaType};

    /// Create a test media item with reasonable defaults.
    pub fn media_item(id: i64, title: &str) -> MediaItem {
        MediaItem::new(id, title).with_field("thumbnail", format!("https://img.test/{}.png", id))
    }

    /// Create a live stream item.
    pub fn live_item(id: i64, title: &str) -> MediaItem {
        media_item(id, title)
            .with_live(true)
            .with_type(MediaType::LiveStream)
    }

    /// Create a recorded video item.
    pub fn recorded_item(id: i64, title: &str) -> MediaItem {
        media_item(id, title).with_type(MediaType::Recorded)
    }

    /// A small catalog mixing live, recorded and untyped items, listed out
    /// of title order.
    pub fn mixed_catalog() -> Vec<MediaItem> {
        vec![
            live_item(1, "Morning Show"),
            recorded_item(2, "Cooking Basics"),
            live_item(3, "Ambient Radio"),
            recorded_item(4, "Travel Diaries"),
            media_item(5, "Late Night Talk"),
            recorded_item(6, "Bird Watching"),
        ]
    }
}
