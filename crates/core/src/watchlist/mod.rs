//! Persisted "watch later" list kept consistent with the catalog.

mod reconciler;
mod types;

pub use reconciler::WatchList;
pub use types::{WatchEntry, WatchListItem, WATCH_LIST_STORAGE_KEY};
