use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::{MediaId, MediaItem};

/// Storage key (before prefixing) of the persisted entries.
pub const WATCH_LIST_STORAGE_KEY: &str = "watch_later_items";

/// A persisted reference into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub media_id: MediaId,
    pub added_at: DateTime<Utc>,
}

impl WatchEntry {
    pub fn new(media_id: impl Into<MediaId>) -> Self {
        Self {
            media_id: media_id.into(),
            added_at: Utc::now(),
        }
    }
}

/// A watch entry joined with its catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchListItem {
    #[serde(flatten)]
    pub media: MediaItem,
    pub added_at: DateTime<Utc>,
}
