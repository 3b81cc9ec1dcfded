pub mod app;
pub mod catalog;
pub mod config;
pub mod events;
pub mod media;
pub mod metrics;
pub mod polling;
pub mod storage;
pub mod testing;
pub mod watchlist;

pub use app::MediaListApp;
pub use catalog::{CatalogCache, CatalogIndex, FilterBy, SortDirection, SortOptions};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    StorageBackend,
};
pub use events::{EventBus, EventKind, MediaEvent, Subscription};
pub use media::{FetchError, HttpMediaSource, MediaId, MediaItem, MediaSource, MediaType};
pub use polling::{PollError, PollScheduler, PollStatus, PollingConfig};
pub use storage::{create_store, KeyValueStore, StorageError, StorageGateway};
pub use watchlist::{WatchEntry, WatchList, WatchListItem};
