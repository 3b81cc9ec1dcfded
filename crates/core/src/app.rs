//! Client bootstrap: one bus, cache, watch list and scheduler per instance.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::catalog::CatalogCache;
use crate::config::Config;
use crate::events::{EventBus, EventKind, MediaEvent, Subscription};
use crate::media::MediaSource;
use crate::polling::{PollScheduler, PollingConfig};
use crate::storage::{KeyValueStore, StorageGateway};
use crate::watchlist::WatchList;

/// An independent media-list client.
///
/// Nothing is shared between instances, so several clients (or tests) can
/// run side by side in one process. The counters in [`crate::metrics`] are
/// the exception: they sum over every instance.
pub struct MediaListApp {
    bus: EventBus,
    catalog: Arc<CatalogCache>,
    watch_list: Arc<WatchList>,
    scheduler: PollScheduler,
    autostart: bool,
    ingest_subscription: Mutex<Option<Subscription>>,
}

impl MediaListApp {
    pub fn new(
        polling: &PollingConfig,
        source: Arc<dyn MediaSource>,
        storage: StorageGateway,
    ) -> Self {
        let bus = EventBus::new();
        Self {
            catalog: Arc::new(CatalogCache::new(bus.clone())),
            watch_list: Arc::new(WatchList::new(storage, bus.clone())),
            scheduler: PollScheduler::new(source, bus.clone(), polling),
            autostart: polling.autostart,
            ingest_subscription: Mutex::new(None),
            bus,
        }
    }

    /// Build a client from loaded configuration and an opened store.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn MediaSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let storage = StorageGateway::new(store).with_prefix(config.storage.prefix.clone());
        Self::new(&config.polling, source, storage)
    }

    /// Wire components together and load the persisted watch list.
    ///
    /// Polling is not started. Calling it again has no effect.
    pub fn activate(&self) {
        let mut ingest = self
            .ingest_subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if ingest.is_some() {
            debug!("Media list client already active");
            return;
        }

        let catalog = Arc::downgrade(&self.catalog);
        *ingest = Some(self.bus.subscribe(EventKind::PollingResult, move |event| {
            let (Some(catalog), MediaEvent::PollingResult { items, .. }) =
                (catalog.upgrade(), event)
            else {
                return;
            };
            catalog.ingest(items.clone());
        }));

        self.scheduler.init();
        self.watch_list.load();
        self.watch_list.attach();
        info!("Media list client activated");
    }

    pub fn is_active(&self) -> bool {
        self.ingest_subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether polling should begin as soon as the client is up.
    pub fn autostart(&self) -> bool {
        self.autostart
    }

    pub fn start(&self) {
        self.scheduler.start();
    }

    pub fn stop(&self) {
        self.scheduler.stop();
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    pub fn watch_list(&self) -> &Arc<WatchList> {
        &self.watch_list
    }

    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use crate::testing::MockMediaSource;

    fn app() -> MediaListApp {
        MediaListApp::from_config(
            &Config::default(),
            Arc::new(MockMediaSource::new()),
            Arc::new(MemoryKeyValueStore::new()),
        )
    }

    #[test]
    fn test_activate_is_idempotent() {
        let app = app();
        assert!(!app.is_active());

        app.activate();
        app.activate();
        assert!(app.is_active());

        let bus = app.bus();
        assert_eq!(bus.subscriber_count(EventKind::PollingResult), 1);
        assert_eq!(bus.subscriber_count(EventKind::PollingIntervalChanged), 1);
        assert_eq!(bus.subscriber_count(EventKind::MediaListUpdated), 1);
        assert_eq!(bus.subscriber_count(EventKind::WatchListAdd), 1);
        assert_eq!(bus.subscriber_count(EventKind::WatchListRemove), 1);
    }

    #[test]
    fn test_polling_result_feeds_catalog() {
        let app = app();
        app.activate();

        app.bus().publish(MediaEvent::PollingResult {
            generation: 0,
            items: crate::testing::fixtures::mixed_catalog(),
        });
        assert_eq!(app.catalog().len(), 6);
    }

    #[test]
    fn test_instances_are_independent() {
        let first = app();
        let second = app();
        first.activate();

        first.bus().publish(MediaEvent::WatchListAdd { media_id: 1.into() });
        assert_eq!(first.watch_list().len(), 1);
        assert!(second.watch_list().is_empty());
        assert_eq!(second.bus().subscriber_count(EventKind::WatchListAdd), 0);
    }

    #[test]
    fn test_autostart_follows_config() {
        let mut config = Config::default();
        config.polling.autostart = false;
        let app = MediaListApp::from_config(
            &config,
            Arc::new(MockMediaSource::new()),
            Arc::new(MemoryKeyValueStore::new()),
        );
        assert!(!app.autostart());
    }
}
