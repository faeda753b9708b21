// ── State synchronizer ──
//
// Owns the latest activity state and connectivity flag for one device.
// All reads and writes of that state and of the observer list go through
// a single mutex; observer callbacks always run with the lock released.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use snoo_api::{ActivityState, EventFeed, FeedMessage, ListenerHandle};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::observer::{ObserverEntry, ObserverFn, ObserverResult, Subscription};
use super::snapshot::SynchronizerSnapshot;
use crate::config::SyncConfig;
use crate::error::CoreError;
use crate::stream::SnapshotStream;

// ── Lifecycle ────────────────────────────────────────────────────────

/// Where a synchronizer is in its attach/detach lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, never attached.
    Idle,
    /// Listeners registered, history fetch in progress.
    Attaching,
    Attached,
    /// Inert. No further mutation or notification.
    Detached,
}

// ── Synchronizer ─────────────────────────────────────────────────────

/// Reconciles a device's event feed into one authoritative snapshot.
///
/// Cheaply cloneable via `Arc<SyncInner>`. Feed listeners hold only a weak
/// reference, so dropping every handle tears the synchronizer down even
/// without an explicit [`detach`](Self::detach).
#[derive(Clone)]
pub struct Synchronizer {
    inner: Arc<SyncInner>,
}

pub(crate) struct SyncInner {
    feed: Arc<dyn EventFeed>,
    config: SyncConfig,
    state: Mutex<SyncState>,
    snapshot_tx: watch::Sender<SynchronizerSnapshot>,
    attach_gate: tokio::sync::Mutex<()>,
    next_observer_id: AtomicU64,
}

struct SyncState {
    lifecycle: Lifecycle,
    activity: Option<Arc<ActivityState>>,
    connected: bool,
    // Set once a live event of each kind has been applied, so a slower
    // history fetch never overwrites it.
    live_activity_seen: bool,
    live_connectivity_seen: bool,
    observers: Vec<ObserverEntry>,
    listener_handles: Vec<ListenerHandle>,
}

impl SyncState {
    fn snapshot(&self) -> SynchronizerSnapshot {
        SynchronizerSnapshot::new(self.activity.clone(), self.connected)
    }
}

impl SyncInner {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn remove_observer(&self, id: u64) {
        self.lock().observers.retain(|entry| entry.id != id);
    }
}

impl Synchronizer {
    /// Create a synchronizer for `feed`. Does NOT touch the feed; call
    /// [`attach()`](Self::attach) to register listeners and seed state.
    pub fn new(feed: Arc<dyn EventFeed>, config: SyncConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(SynchronizerSnapshot::default());
        Self {
            inner: Arc::new(SyncInner {
                feed,
                config,
                state: Mutex::new(SyncState {
                    lifecycle: Lifecycle::Idle,
                    activity: None,
                    connected: false,
                    live_activity_seen: false,
                    live_connectivity_seen: false,
                    observers: Vec::new(),
                    listener_handles: Vec::new(),
                }),
                snapshot_tx,
                attach_gate: tokio::sync::Mutex::new(()),
                next_observer_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lock().lifecycle
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle() == Lifecycle::Attached
    }

    pub fn is_detached(&self) -> bool {
        self.lifecycle() == Lifecycle::Detached
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Subscribe to the feed and seed the snapshot.
    ///
    /// Listeners are registered *before* history is read, so no event can
    /// fall between the two. The most recent history entry seeds the
    /// activity state only if no live activity event arrived meanwhile;
    /// connectivity is read the same way. A failed history fetch is
    /// logged and leaves the activity state empty.
    ///
    /// Attaching an attached synchronizer returns the current snapshot
    /// without fetching again. Attaching after [`detach`](Self::detach)
    /// fails with [`CoreError::Detached`].
    pub async fn attach(&self) -> Result<SynchronizerSnapshot, CoreError> {
        let _gate = self.inner.attach_gate.lock().await;

        {
            let mut state = self.inner.lock();
            match state.lifecycle {
                Lifecycle::Detached => return Err(CoreError::Detached),
                Lifecycle::Attached => {
                    debug!("already attached");
                    return Ok(state.snapshot());
                }
                Lifecycle::Idle | Lifecycle::Attaching => state.lifecycle = Lifecycle::Attaching,
            }
        }

        let handles = self.register_listeners();
        let stale = {
            let mut state = self.inner.lock();
            if state.lifecycle == Lifecycle::Detached {
                drop(state);
                drop(handles);
                return Err(CoreError::Detached);
            }
            std::mem::replace(&mut state.listener_handles, handles)
        };
        // Left by a cancelled attach. Removal hooks run without our lock held.
        for handle in &stale {
            handle.remove();
        }

        let connected = self.inner.feed.is_connected();
        let history = self
            .inner
            .feed
            .fetch_history(self.inner.config.history_count)
            .await;

        let snapshot = {
            let mut state = self.inner.lock();
            if state.lifecycle == Lifecycle::Detached {
                return Err(CoreError::Detached);
            }

            if !state.live_connectivity_seen {
                state.connected = connected;
            }

            match history {
                Ok(states) => match states.into_iter().next() {
                    Some(_) if state.live_activity_seen => {
                        debug!("live activity arrived during attach; discarding history");
                    }
                    Some(latest) => {
                        debug!(
                            state = latest.state_machine.state.as_str(),
                            "seeded from history"
                        );
                        state.activity = Some(Arc::new(latest));
                    }
                    None => debug!("feed history is empty"),
                },
                Err(e) => {
                    warn!(error = %e, "history fetch failed; starting without activity state");
                }
            }

            state.lifecycle = Lifecycle::Attached;
            let snapshot = state.snapshot();
            self.inner.snapshot_tx.send_replace(snapshot.clone());
            snapshot
        };

        info!(
            connected = snapshot.connected,
            seeded = snapshot.activity.is_some(),
            "synchronizer attached"
        );
        self.notify();
        Ok(snapshot)
    }

    /// Unregister from the feed and go inert.
    ///
    /// Idempotent. Safe to call from inside an observer: notifications
    /// already running finish their current callback, none start after.
    /// Detaching a never-attached synchronizer is a no-op.
    pub fn detach(&self) {
        let handles = {
            let mut state = self.inner.lock();
            match state.lifecycle {
                Lifecycle::Detached => {
                    debug!("already detached");
                    return;
                }
                Lifecycle::Idle => {
                    debug!("detach before attach; nothing to do");
                    return;
                }
                Lifecycle::Attaching | Lifecycle::Attached => {}
            }
            state.lifecycle = Lifecycle::Detached;
            for entry in state.observers.drain(..) {
                entry.active.store(false, Ordering::SeqCst);
            }
            std::mem::take(&mut state.listener_handles)
        };

        for handle in &handles {
            handle.remove();
        }
        info!(listeners = handles.len(), "synchronizer detached");
    }

    fn register_listeners(&self) -> Vec<ListenerHandle> {
        let weak = Arc::downgrade(&self.inner);
        let activity = self
            .inner
            .feed
            .add_activity_listener(Arc::new(move |state: Arc<ActivityState>| {
                if let Some(inner) = weak.upgrade() {
                    Synchronizer { inner }.on_activity_event(state);
                }
            }));

        let weak = Arc::downgrade(&self.inner);
        let connectivity = self
            .inner
            .feed
            .add_connectivity_listener(Arc::new(move |connected: bool| {
                if let Some(inner) = weak.upgrade() {
                    Synchronizer { inner }.on_connectivity_event(connected);
                }
            }));

        vec![activity, connectivity]
    }

    // ── Feed ingestion ───────────────────────────────────────────────

    /// Replace the stored activity state. Last write wins.
    pub fn on_activity_event(&self, activity: Arc<ActivityState>) {
        self.ingest(FeedMessage::Activity(activity));
    }

    /// Replace the stored connectivity flag.
    pub fn on_connectivity_event(&self, connected: bool) {
        self.ingest(FeedMessage::Connectivity(connected));
    }

    /// Single mutation entry point: apply one feed message, then notify.
    ///
    /// Messages are only applied between `attach()` and `detach()`.
    pub fn ingest(&self, message: FeedMessage) {
        {
            let mut state = self.inner.lock();
            match state.lifecycle {
                Lifecycle::Attaching | Lifecycle::Attached => {}
                Lifecycle::Idle => {
                    debug!("ignoring feed message before attach");
                    return;
                }
                Lifecycle::Detached => {
                    debug!("ignoring feed message after detach");
                    return;
                }
            }
            match message {
                FeedMessage::Activity(activity) => {
                    info!(
                        event = activity.event.as_str(),
                        state = activity.state_machine.state.as_str(),
                        session_id = %activity.state_machine.session_id,
                        "activity state event"
                    );
                    state.live_activity_seen = true;
                    state.activity = Some(activity);
                }
                FeedMessage::Connectivity(connected) => {
                    info!(connected, "connectivity event");
                    state.live_connectivity_seen = true;
                    state.connected = connected;
                }
            }
            self.inner.snapshot_tx.send_replace(state.snapshot());
        }
        self.notify();
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> SynchronizerSnapshot {
        self.inner.lock().snapshot()
    }

    /// Async view of the snapshot, updated after every mutation.
    pub fn watch(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot_tx.subscribe())
    }

    // ── Observers ────────────────────────────────────────────────────

    /// Register a zero-argument callback run after every mutation.
    ///
    /// The callback re-reads whatever it needs through
    /// [`snapshot()`](Self::snapshot). Returning `Err` or panicking is
    /// logged and does not affect other observers. Subscribing to a
    /// detached synchronizer returns an already-inactive subscription.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn() -> ObserverResult + Send + Sync + 'static,
    {
        let id = self.inner.next_observer_id.fetch_add(1, Ordering::Relaxed);
        let mut state = self.inner.lock();
        let active = Arc::new(AtomicBool::new(state.lifecycle != Lifecycle::Detached));
        if state.lifecycle == Lifecycle::Detached {
            debug!(observer = id, "subscribe after detach; observer will never fire");
        } else {
            state.observers.push(ObserverEntry {
                id,
                active: Arc::clone(&active),
                callback: Arc::new(observer),
            });
        }
        Subscription::new(id, active, Arc::downgrade(&self.inner))
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }

    fn notify(&self) {
        let observers: Vec<(u64, Arc<AtomicBool>, ObserverFn)> = {
            let state = self.inner.lock();
            if state.lifecycle == Lifecycle::Detached {
                return;
            }
            state
                .observers
                .iter()
                .map(|entry| (entry.id, Arc::clone(&entry.active), Arc::clone(&entry.callback)))
                .collect()
        };

        for (id, active, callback) in observers {
            if self.is_detached() {
                debug!("detached during notification; stopping");
                break;
            }
            if !active.load(Ordering::SeqCst) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| callback())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(observer = id, error = %e, "observer failed"),
                Err(payload) => {
                    error!(
                        observer = id,
                        panic = panic_message(payload.as_ref()),
                        "observer panicked"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Synchronizer")
            .field("lifecycle", &state.lifecycle)
            .field("connected", &state.connected)
            .field("has_activity", &state.activity.is_some())
            .field("observers", &state.observers.len())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::{TimeZone, Utc};
    use snoo_api::{EventType, MemoryFeed, SessionLevel, StateMachine};

    use super::*;

    fn activity(level: SessionLevel) -> ActivityState {
        ActivityState {
            left_safety_clip: true,
            right_safety_clip: true,
            sw_version: None,
            event: EventType::Activity,
            event_time: Utc.timestamp_millis_opt(1_620_000_000_000).unwrap(),
            state_machine: StateMachine {
                state: level,
                since_session_start: None,
                is_active_session: false,
                session_id: "1".into(),
                up_transition: SessionLevel::None,
                down_transition: SessionLevel::None,
                hold: false,
                audio: true,
                sticky_white_noise: false,
                weaning: false,
                time_left: None,
            },
            system_state: "normal".into(),
        }
    }

    #[tokio::test]
    async fn attach_registers_and_detach_unregisters() {
        let feed = MemoryFeed::new(true);
        let sync = Synchronizer::new(Arc::new(feed.clone()), SyncConfig::default());

        sync.attach().await.unwrap();
        assert!(sync.is_attached());
        assert_eq!(feed.listener_count(), 2);

        sync.detach();
        assert!(sync.is_detached());
        assert_eq!(feed.listener_count(), 0);
    }

    #[tokio::test]
    async fn second_attach_is_a_noop() {
        let feed = MemoryFeed::new(true);
        feed.record_history(activity(SessionLevel::Baseline));
        let sync = Synchronizer::new(Arc::new(feed.clone()), SyncConfig::default());

        let first = sync.attach().await.unwrap();
        let second = sync.attach().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(feed.listener_count(), 2);
    }

    #[tokio::test]
    async fn attach_after_detach_fails() {
        let sync = Synchronizer::new(Arc::new(MemoryFeed::new(true)), SyncConfig::default());
        sync.attach().await.unwrap();
        sync.detach();
        assert!(matches!(sync.attach().await, Err(CoreError::Detached)));
    }

    #[test]
    fn detach_without_attach_stays_idle() {
        let sync = Synchronizer::new(Arc::new(MemoryFeed::new(true)), SyncConfig::default());
        sync.detach();
        assert_eq!(sync.lifecycle(), Lifecycle::Idle);
    }

    #[tokio::test]
    async fn messages_before_attach_are_ignored() {
        let feed = MemoryFeed::new(true);
        feed.record_history(activity(SessionLevel::Baseline));
        let sync = Synchronizer::new(Arc::new(feed.clone()), SyncConfig::default());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = sync.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        sync.on_activity_event(Arc::new(activity(SessionLevel::Level3)));
        sync.on_connectivity_event(false);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sync.snapshot(), SynchronizerSnapshot::default());

        let snapshot = sync.attach().await.unwrap();
        assert_eq!(
            snapshot.activity().unwrap().state_machine.state,
            SessionLevel::Baseline
        );
        assert!(snapshot.connected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn feed_publish_reaches_observers() {
        let feed = MemoryFeed::new(true);
        let sync = Synchronizer::new(Arc::new(feed.clone()), SyncConfig::default());
        sync.attach().await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = sync.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        feed.publish(FeedMessage::Activity(Arc::new(activity(SessionLevel::Level1))));
        feed.publish(FeedMessage::Connectivity(false));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let snap = sync.snapshot();
        assert_eq!(
            snap.activity().unwrap().state_machine.state,
            SessionLevel::Level1
        );
        assert!(!snap.connected);
    }

    #[test]
    fn subscribe_after_detach_is_inactive() {
        let sync = Synchronizer::new(Arc::new(MemoryFeed::new(true)), SyncConfig::default());
        tokio_test::block_on(sync.attach()).unwrap();
        sync.detach();

        let sub = sync.subscribe(|| Ok(()));
        assert!(!sub.is_active());
        assert_eq!(sync.observer_count(), 0);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
