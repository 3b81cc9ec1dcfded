use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use super::types::{WatchEntry, WatchListItem, WATCH_LIST_STORAGE_KEY};
use crate::catalog::CatalogIndex;
use crate::events::{EventBus, EventKind, MediaEvent, Subscription};
use crate::media::MediaId;
use crate::metrics::WATCH_LIST_PRUNED;
use crate::storage::{StorageError, StorageGateway};

#[derive(Default)]
struct WatchListState {
    /// Insertion order is watch order.
    entries: Vec<WatchEntry>,
    /// Catalog seen at the last reconciliation.
    catalog: Arc<CatalogIndex>,
}

/// Ordered, persisted watch entries reconciled against the catalog.
///
/// Every mutation is written through to storage as the full list. When a
/// write fails the in-memory list keeps the change and the error is
/// returned to the caller.
pub struct WatchList {
    storage: StorageGateway,
    bus: EventBus,
    state: Mutex<WatchListState>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl WatchList {
    pub fn new(storage: StorageGateway, bus: EventBus) -> Self {
        Self {
            storage,
            bus,
            state: Mutex::new(WatchListState::default()),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, WatchListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriptions(&self) -> MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the in-memory entries with the persisted list.
    ///
    /// A missing, empty or unreadable value yields an empty list. Returns
    /// the number of entries loaded.
    pub fn load(&self) -> usize {
        let entries = match self.storage.get::<Vec<WatchEntry>>(WATCH_LIST_STORAGE_KEY) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not load watch list, starting empty: {}", e);
                Vec::new()
            }
        };

        let count = entries.len();
        self.state().entries = entries;
        info!("Loaded {} watch list entries", count);
        count
    }

    /// Append an entry for `media_id`. Duplicates are kept.
    pub fn add(&self, media_id: MediaId) -> Result<(), StorageError> {
        {
            let mut state = self.state();
            debug!("Adding {} to watch list", media_id);
            state.entries.push(WatchEntry::new(media_id));
            self.persist(&state)?;
        }
        self.publish_view();
        Ok(())
    }

    /// Drop every entry for `media_id`. Unknown ids still persist the list.
    pub fn remove(&self, media_id: &MediaId) -> Result<(), StorageError> {
        {
            let mut state = self.state();
            let before = state.entries.len();
            state.entries.retain(|entry| &entry.media_id != media_id);
            debug!(
                "Removed {} entries for {} from watch list",
                before - state.entries.len(),
                media_id
            );
            self.persist(&state)?;
        }
        self.publish_view();
        Ok(())
    }

    /// Keep `catalog` and prune entries whose id it does not contain.
    ///
    /// Returns the surviving entries.
    pub fn reconcile_with_catalog(
        &self,
        catalog: Arc<CatalogIndex>,
    ) -> Result<Vec<WatchEntry>, StorageError> {
        let entries = {
            let mut state = self.state();
            let before = state.entries.len();
            state
                .entries
                .retain(|entry| catalog.contains_key(&entry.media_id));
            state.catalog = catalog;

            let pruned = before - state.entries.len();
            if pruned > 0 {
                info!("Pruned {} watch list entries missing from catalog", pruned);
                WATCH_LIST_PRUNED.inc_by(pruned as u64);
            }

            self.persist(&state)?;
            state.entries.clone()
        };
        self.publish_view();
        Ok(entries)
    }

    fn persist(&self, state: &WatchListState) -> Result<(), StorageError> {
        self.storage.put(WATCH_LIST_STORAGE_KEY, &state.entries)
    }

    fn publish_view(&self) {
        let items = self.view();
        self.bus.publish(MediaEvent::WatchListUpdated { items });
    }

    /// Entries joined with their catalog items, in watch order.
    ///
    /// Entries without a catalog item are left out.
    pub fn view(&self) -> Vec<WatchListItem> {
        let state = self.state();
        state
            .entries
            .iter()
            .filter_map(|entry| {
                state.catalog.get(&entry.media_id).map(|media| WatchListItem {
                    media: media.clone(),
                    added_at: entry.added_at,
                })
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<WatchEntry> {
        self.state().entries.clone()
    }

    pub fn contains(&self, media_id: &MediaId) -> bool {
        self.state()
            .entries
            .iter()
            .any(|entry| &entry.media_id == media_id)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to catalog updates and add/remove requests.
    ///
    /// Handler failures are logged. Calling it again has no effect.
    pub fn attach(self: &Arc<Self>) {
        let mut subscriptions = self.subscriptions();
        if !subscriptions.is_empty() {
            return;
        }

        let weak = Arc::downgrade(self);
        subscriptions.push(self.bus.subscribe(EventKind::MediaListUpdated, move |event| {
            let (Some(list), MediaEvent::MediaListUpdated { catalog }) = (weak.upgrade(), event)
            else {
                return;
            };
            if let Err(e) = list.reconcile_with_catalog(Arc::clone(catalog)) {
                error!("Failed to persist reconciled watch list: {}", e);
            }
        }));

        let weak = Arc::downgrade(self);
        subscriptions.push(self.bus.subscribe(EventKind::WatchListAdd, move |event| {
            let (Some(list), MediaEvent::WatchListAdd { media_id }) = (weak.upgrade(), event)
            else {
                return;
            };
            if let Err(e) = list.add(media_id.clone()) {
                error!("Failed to persist watch list after adding {}: {}", media_id, e);
            }
        }));

        let weak = Arc::downgrade(self);
        subscriptions.push(self.bus.subscribe(EventKind::WatchListRemove, move |event| {
            let (Some(list), MediaEvent::WatchListRemove { media_id }) = (weak.upgrade(), event)
            else {
                return;
            };
            if let Err(e) = list.remove(media_id) {
                error!(
                    "Failed to persist watch list after removing {}: {}",
                    media_id, e
                );
            }
        }));

        debug!("Watch list attached to event bus");
    }

    /// Drop the subscriptions made by [`attach`](Self::attach).
    pub fn detach(&self) {
        for subscription in self.subscriptions().drain(..) {
            self.bus.unsubscribe(subscription);
        }
    }
}

impl Drop for WatchList {
    fn drop(&mut self) {
        self.detach();
    }
}
