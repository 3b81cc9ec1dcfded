use std::fmt;
use std::sync::Arc;

use crate::catalog::CatalogIndex;
use crate::media::{MediaId, MediaItem};
use crate::watchlist::WatchListItem;

pub const EVENT_POLLING_RESULT: &str = "polling:result";
pub const EVENT_POLLING_FAILED: &str = "polling:failed";
pub const EVENT_POLLING_INTERVAL_CHANGED: &str = "polling:interval-changed";
pub const EVENT_WATCHLIST_ADD: &str = "watchlist:add";
pub const EVENT_WATCHLIST_REMOVE: &str = "watchlist:remove";
pub const EVENT_WATCHLIST_UPDATED: &str = "watchlist:updated";
pub const EVENT_MEDIA_LIST_UPDATED: &str = "medialist:updated";

/// Name under which handlers are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PollingResult,
    PollingFailed,
    PollingIntervalChanged,
    WatchListAdd,
    WatchListRemove,
    WatchListUpdated,
    MediaListUpdated,
}

impl EventKind {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::PollingResult => EVENT_POLLING_RESULT,
            EventKind::PollingFailed => EVENT_POLLING_FAILED,
            EventKind::PollingIntervalChanged => EVENT_POLLING_INTERVAL_CHANGED,
            EventKind::WatchListAdd => EVENT_WATCHLIST_ADD,
            EventKind::WatchListRemove => EVENT_WATCHLIST_REMOVE,
            EventKind::WatchListUpdated => EVENT_WATCHLIST_UPDATED,
            EventKind::MediaListUpdated => EVENT_MEDIA_LIST_UPDATED,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Domain events carried by the bus.
#[derive(Debug, Clone)]
pub enum MediaEvent {
    /// A poll cycle fetched the catalog.
    PollingResult {
        /// Scheduler generation the fetch was issued under.
        generation: u64,
        items: Vec<MediaItem>,
    },
    /// A poll cycle failed and polling has stopped.
    PollingFailed { generation: u64, message: String },
    /// The user picked a new polling interval.
    PollingIntervalChanged { seconds: u64 },
    /// Request to add an item to the watch list.
    WatchListAdd { media_id: MediaId },
    /// Request to remove every entry for an item from the watch list.
    WatchListRemove { media_id: MediaId },
    /// The watch list changed; carries the fresh view.
    WatchListUpdated { items: Vec<WatchListItem> },
    /// The catalog cache ingested a poll result; carries the accumulated index.
    MediaListUpdated { catalog: Arc<CatalogIndex> },
}

impl MediaEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MediaEvent::PollingResult { .. } => EventKind::PollingResult,
            MediaEvent::PollingFailed { .. } => EventKind::PollingFailed,
            MediaEvent::PollingIntervalChanged { .. } => EventKind::PollingIntervalChanged,
            MediaEvent::WatchListAdd { .. } => EventKind::WatchListAdd,
            MediaEvent::WatchListRemove { .. } => EventKind::WatchListRemove,
            MediaEvent::WatchListUpdated { .. } => EventKind::WatchListUpdated,
            MediaEvent::MediaListUpdated { .. } => EventKind::MediaListUpdated,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}
