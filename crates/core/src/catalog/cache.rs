use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use super::{CatalogIndex, FilterBy, SortDirection, SortOptions};
use crate::events::{EventBus, MediaEvent};
use crate::media::{MediaId, MediaItem};

#[derive(Default)]
struct CatalogState {
    /// Latest poll result, sorted in place on read.
    items: Vec<MediaItem>,
    /// Every item ever ingested. Shared copy-on-write with event payloads.
    index: Arc<CatalogIndex>,
    sort: SortOptions,
    filter: FilterBy,
}

/// Holds the latest catalog and the accumulated id index.
pub struct CatalogCache {
    bus: EventBus,
    state: Mutex<CatalogState>,
}

impl CatalogCache {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            state: Mutex::new(CatalogState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the working list and merge `items` into the index.
    ///
    /// Publishes `medialist:updated` with the accumulated index once the
    /// cache is consistent again. Returns the same snapshot.
    pub fn ingest(&self, items: Vec<MediaItem>) -> Arc<CatalogIndex> {
        let snapshot = {
            let mut state = self.state();
            let index = Arc::make_mut(&mut state.index);
            for item in &items {
                index.insert(item.id.clone(), item.clone());
            }
            debug!(
                "Ingested {} items, catalog now holds {}",
                items.len(),
                index.len()
            );
            state.items = items;
            Arc::clone(&state.index)
        };

        self.bus.publish(MediaEvent::MediaListUpdated {
            catalog: Arc::clone(&snapshot),
        });
        snapshot
    }

    /// Latest poll result, sorted then filtered.
    ///
    /// Sorting is applied to the working list itself, so consecutive reads
    /// with unchanged options return the same order.
    pub fn read(&self) -> Vec<MediaItem> {
        let mut state = self.state();
        let CatalogState {
            items, sort, filter, ..
        } = &mut *state;
        items.sort_by(|a, b| sort.compare(a, b));
        items
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    pub fn update_sort_by_property(&self, field: impl Into<String>) {
        let field = field.into();
        info!("Sorting catalog by '{}'", field);
        let mut state = self.state();
        state.sort.by = field;
        Self::sort_items(&mut state);
    }

    pub fn update_sort_by_dir(&self, dir: SortDirection) {
        info!("Sorting catalog {:?}", dir);
        let mut state = self.state();
        state.sort.dir = dir;
        Self::sort_items(&mut state);
    }

    pub fn update_filter_by(&self, filter: FilterBy) {
        info!("Filtering catalog by '{}'", filter);
        self.state().filter = filter;
    }

    fn sort_items(state: &mut CatalogState) {
        let CatalogState { items, sort, .. } = state;
        items.sort_by(|a, b| sort.compare(a, b));
    }

    pub fn sort_options(&self) -> SortOptions {
        self.state().sort.clone()
    }

    pub fn filter_by(&self) -> FilterBy {
        self.state().filter
    }

    /// Snapshot of the accumulated index.
    pub fn catalog(&self) -> Arc<CatalogIndex> {
        Arc::clone(&self.state().index)
    }

    pub fn get(&self, id: &MediaId) -> Option<MediaItem> {
        self.state().index.get(id).cloned()
    }

    /// Number of distinct items ever ingested.
    pub fn len(&self) -> usize {
        self.state().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::events::EventKind;
    use crate::media::MediaType;
    use crate::testing::fixtures;

    fn titles(items: &[MediaItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_ingest_accumulates_union_of_ids() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(vec![MediaItem::new(1, "a"), MediaItem::new(2, "b")]);
        cache.ingest(vec![MediaItem::new(2, "b2"), MediaItem::new(3, "c")]);
        cache.ingest(vec![]);

        let catalog = cache.catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[&MediaId::from(1)].title, "a");
        assert_eq!(catalog[&MediaId::from(2)].title, "b2");
        assert_eq!(catalog[&MediaId::from(3)].title, "c");
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_working_list_is_latest_poll_only() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(vec![MediaItem::new(1, "a"), MediaItem::new(2, "b")]);
        cache.ingest(vec![MediaItem::new(3, "c")]);

        assert_eq!(titles(&cache.read()), vec!["c"]);
        assert!(cache.get(&MediaId::from(1)).is_some());
    }

    #[test]
    fn test_ingest_publishes_accumulated_catalog() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&seen);
        bus.subscribe(EventKind::MediaListUpdated, move |event| {
            if let MediaEvent::MediaListUpdated { catalog } = event {
                sink.store(catalog.len(), Ordering::SeqCst);
            }
        });

        let cache = CatalogCache::new(bus);
        cache.ingest(vec![MediaItem::new(1, "a")]);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        cache.ingest(vec![MediaItem::new(2, "b")]);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshots_are_not_mutated_by_later_ingest() {
        let cache = CatalogCache::new(EventBus::new());
        let first = cache.ingest(vec![MediaItem::new(1, "a")]);
        cache.ingest(vec![MediaItem::new(2, "b")]);
        assert_eq!(first.len(), 1);
        assert_eq!(cache.catalog().len(), 2);
    }

    #[test]
    fn test_handler_can_read_cache_during_publish() {
        let bus = EventBus::new();
        let cache = Arc::new(CatalogCache::new(bus.clone()));
        let observed = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&cache);
        let sink = Arc::clone(&observed);
        bus.subscribe(EventKind::MediaListUpdated, move |_| {
            if let Some(cache) = weak.upgrade() {
                sink.store(cache.read().len(), Ordering::SeqCst);
            }
        });

        cache.ingest(vec![MediaItem::new(1, "a"), MediaItem::new(2, "b")]);
        assert_eq!(observed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_read_default_sort_is_title_ascending() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        let items = cache.read();
        let sorted: Vec<_> = items.windows(2).map(|w| w[0].title <= w[1].title).collect();
        assert!(sorted.iter().all(|ok| *ok));
    }

    #[test]
    fn test_read_title_descending() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        cache.update_sort_by_property("title");
        cache.update_sort_by_dir(SortDirection::Descending);

        let items = cache.read();
        assert_eq!(items.len(), fixtures::mixed_catalog().len());
        assert!(items.windows(2).all(|w| w[0].title >= w[1].title));
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(vec![
            MediaItem::new(1, "same"),
            MediaItem::new(2, "same"),
            MediaItem::new(3, "same"),
        ]);
        let ids: Vec<_> = cache.read().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![MediaId::from(1), MediaId::from(2), MediaId::from(3)]);
    }

    #[test]
    fn test_sort_by_extra_field() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(vec![
            MediaItem::new(1, "a").with_field("viewers", 30),
            MediaItem::new(2, "b").with_field("viewers", 10),
            MediaItem::new(3, "c"),
        ]);
        cache.update_sort_by_property("viewers");
        assert_eq!(titles(&cache.read()), vec!["c", "b", "a"]);
        assert_eq!(cache.sort_options().by, "viewers");
    }

    #[test]
    fn test_filter_live() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        cache.update_filter_by(FilterBy::Live);

        let items = cache.read();
        let expected = fixtures::mixed_catalog()
            .into_iter()
            .filter(|i| i.is_live)
            .count();
        assert_eq!(items.len(), expected);
        assert!(items.iter().all(|i| i.is_live));
    }

    #[test]
    fn test_filter_offline() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        cache.update_filter_by(FilterBy::Offline);

        let items = cache.read();
        let expected = fixtures::mixed_catalog()
            .into_iter()
            .filter(|i| !i.is_live)
            .count();
        assert_eq!(items.len(), expected);
        assert!(items.iter().all(|i| !i.is_live));
    }

    #[test]
    fn test_filter_video() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        cache.update_filter_by(FilterBy::Video);

        let items = cache.read();
        let expected = fixtures::mixed_catalog()
            .into_iter()
            .filter(|i| i.media_type == Some(MediaType::Recorded))
            .count();
        assert_eq!(items.len(), expected);
        assert!(items.iter().all(|i| i.is_recorded()));
    }

    #[test]
    fn test_unknown_filter_passes_everything() {
        let cache = CatalogCache::new(EventBus::new());
        cache.ingest(fixtures::mixed_catalog());
        cache.update_filter_by(FilterBy::from_token("bogus"));
        assert_eq!(cache.filter_by(), FilterBy::All);
        assert_eq!(cache.read().len(), fixtures::mixed_catalog().len());
    }

    #[test]
    fn test_empty_cache() {
        let cache = CatalogCache::new(EventBus::new());
        assert!(cache.is_empty());
        assert!(cache.read().is_empty());
        assert!(cache.get(&MediaId::from(1)).is_none());
    }
}
