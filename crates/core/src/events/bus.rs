use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::{EventKind, MediaEvent};
use crate::metrics::EVENTS_PUBLISHED;

/// Callback invoked for every matching event.
pub type EventHandler = Arc<dyn Fn(&MediaEvent) + Send + Sync>;

/// Handle identifying one registration, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<EventKind, Vec<(u64, EventHandler)>>>,
}

/// Named-event publish/subscribe registry.
///
/// Cheaply cloneable; clones share the same registry. Each application
/// instance owns its own bus, there is no process-wide instance.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, HashMap<EventKind, Vec<(u64, EventHandler)>>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` for `kind`.
    ///
    /// Handlers run in registration order. Registering the same closure
    /// twice yields two independent registrations.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&MediaEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        trace!("Subscribed handler {} to {}", id, kind);
        Subscription { kind, id }
    }

    /// Remove a single registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = self.subscribers();
        let Some(handlers) = subscribers.get_mut(&subscription.kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        before != handlers.len()
    }

    /// Deliver `event` to every handler registered for its kind.
    ///
    /// The handler list is snapshotted first, so handlers may publish or
    /// subscribe re-entrantly. A handler that re-publishes the event it is
    /// handling recurses without bound.
    pub fn publish(&self, event: MediaEvent) {
        let kind = event.kind();
        let handlers: Vec<EventHandler> = match self.subscribers().get(&kind) {
            Some(handlers) => handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
            None => Vec::new(),
        };

        EVENTS_PUBLISHED.with_label_values(&[kind.name()]).inc();

        if handlers.is_empty() {
            trace!("No subscribers for {}", kind);
            return;
        }

        trace!("Dispatching {} to {} handlers", kind, handlers.len());
        for handler in handlers {
            handler(&event);
        }
    }

    /// Number of handlers currently registered for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers().get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.subscribers();
        let counts: HashMap<&'static str, usize> = subscribers
            .iter()
            .map(|(kind, handlers)| (kind.name(), handlers.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}
