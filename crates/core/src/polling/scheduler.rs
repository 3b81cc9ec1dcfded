//! Poll scheduler implementation.
//!
//! The timer runs as its own task and spawns one task per poll cycle, so
//! stopping the timer never cancels a fetch that is already in flight.
//! Instead every cycle remembers the generation it was issued under and
//! drops its result if polling was stopped or restarted meanwhile.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::config::PollingConfig;
use super::types::{PollError, PollStatus};
use crate::events::{EventBus, EventKind, MediaEvent, Subscription};
use crate::media::MediaSource;
use crate::metrics::{FETCH_DURATION, POLL_CYCLES};

struct SchedulerInner {
    source: Arc<dyn MediaSource>,
    bus: EventBus,
    interval_ms: AtomicU64,
    generation: AtomicU64,
    ticker: Mutex<Option<JoinHandle<()>>>,
    last_error: Mutex<Option<String>>,
    interval_subscription: Mutex<Option<Subscription>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SchedulerInner {
    fn spawn_cycle(inner: &Arc<Self>, generation: u64) {
        tokio::spawn(Arc::clone(inner).run_cycle(generation));
    }

    /// One fetch-and-publish iteration.
    async fn run_cycle(self: Arc<Self>, generation: u64) {
        debug!("Poll cycle started (generation {})", generation);
        let started = std::time::Instant::now();
        let result = self.source.fetch_catalog().await;
        FETCH_DURATION.observe(started.elapsed().as_secs_f64());

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Discarding fetch result from superseded generation {}",
                generation
            );
            POLL_CYCLES.with_label_values(&["stale"]).inc();
            return;
        }

        match result {
            Ok(items) => {
                POLL_CYCLES.with_label_values(&["success"]).inc();
                debug!("Poll cycle fetched {} items", items.len());
                self.bus
                    .publish(MediaEvent::PollingResult { generation, items });
            }
            Err(e) => {
                POLL_CYCLES.with_label_values(&["failure"]).inc();
                let message = e.to_string();
                if self.stop_generation(generation) {
                    error!(
                        "Catalog fetch from {} source failed, polling stopped until restarted: {}",
                        self.source.name(),
                        message
                    );
                    *lock(&self.last_error) = Some(message.clone());
                    self.bus
                        .publish(MediaEvent::PollingFailed { generation, message });
                }
            }
        }
    }

    /// Stop polling if `generation` is still current.
    fn stop_generation(&self, generation: u64) -> bool {
        let mut ticker = lock(&self.ticker);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        true
    }
}

impl Drop for SchedulerInner {
    fn drop(&mut self) {
        let ticker = self
            .ticker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        let subscription = self
            .interval_subscription
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(subscription) = subscription.take() {
            self.bus.unsubscribe(subscription);
        }
    }
}

/// Repeatedly fetches the catalog and publishes `polling:result`.
///
/// Cheaply cloneable. `start`, `stop` and `restart` must be called from
/// within a Tokio runtime.
#[derive(Clone)]
pub struct PollScheduler {
    inner: Arc<SchedulerInner>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn MediaSource>, bus: EventBus, config: &PollingConfig) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                source,
                bus,
                interval_ms: AtomicU64::new(config.interval_ms.max(1)),
                generation: AtomicU64::new(0),
                ticker: Mutex::new(None),
                last_error: Mutex::new(None),
                interval_subscription: Mutex::new(None),
            }),
        }
    }

    /// Listen for `polling:interval-changed` and restart with the new
    /// interval. Calling it again has no effect.
    pub fn init(&self) {
        let mut subscription = lock(&self.inner.interval_subscription);
        if subscription.is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        *subscription = Some(self.inner.bus.subscribe(
            EventKind::PollingIntervalChanged,
            move |event| {
                let MediaEvent::PollingIntervalChanged { seconds } = event else {
                    return;
                };
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let scheduler = PollScheduler { inner };
                if let Err(e) = scheduler.restart_with_interval_secs(*seconds) {
                    warn!("Ignoring polling interval change: {}", e);
                }
            },
        ));
    }

    /// Set the interval used by the next `start`. A running timer keeps its
    /// cadence until restarted.
    pub fn set_interval_ms(&self, interval_ms: u64) -> Result<(), PollError> {
        if interval_ms == 0 {
            return Err(PollError::InvalidInterval(interval_ms));
        }
        self.inner.interval_ms.store(interval_ms, Ordering::SeqCst);
        debug!("Polling interval set to {} ms", interval_ms);
        Ok(())
    }

    pub fn interval_ms(&self) -> u64 {
        self.inner.interval_ms.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.ticker).is_some()
    }

    /// Run one cycle now, then one every interval. No-op while running.
    pub fn start(&self) {
        let mut ticker = lock(&self.inner.ticker);
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Polling already running");
            return;
        }

        let generation = self.inner.generation.load(Ordering::SeqCst);
        let period = Duration::from_millis(self.inner.interval_ms.load(Ordering::SeqCst));
        *lock(&self.inner.last_error) = None;

        info!(
            "Starting catalog polling every {:?} (generation {})",
            period, generation
        );

        SchedulerInner::spawn_cycle(&self.inner, generation);

        let weak = Arc::downgrade(&self.inner);
        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if inner.generation.load(Ordering::SeqCst) != generation {
                    break;
                }
                SchedulerInner::spawn_cycle(&inner, generation);
            }
            debug!("Poll timer for generation {} exited", generation);
        }));
    }

    /// Cancel the timer. In-flight fetches finish but their results are
    /// discarded. No-op while idle.
    pub fn stop(&self) {
        let mut ticker = lock(&self.inner.ticker);
        match ticker.take() {
            Some(handle) => {
                handle.abort();
                let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Polling stopped (next generation {})", generation);
            }
            None => debug!("Polling already stopped"),
        }
    }

    pub fn restart(&self) {
        self.stop();
        self.start();
    }

    /// Apply an interval given in seconds and restart immediately.
    pub fn restart_with_interval_secs(&self, seconds: u64) -> Result<(), PollError> {
        let interval_ms = seconds
            .checked_mul(1000)
            .ok_or(PollError::InvalidInterval(u64::MAX))?;
        self.set_interval_ms(interval_ms)?;
        info!("Polling interval changed to {} s", seconds);
        self.restart();
        Ok(())
    }

    pub fn status(&self) -> PollStatus {
        PollStatus {
            running: self.is_running(),
            interval_ms: self.interval_ms(),
            generation: self.generation(),
            last_error: lock(&self.inner.last_error).clone(),
        }
    }
}
