// ── In-process event feed ──
//
// A cloneable `EventFeed` with no transport behind it. Transport adapters
// (or a recorded session replay) push messages in with `publish`; the
// synchronizer consumes them through the trait like any other feed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};

use super::{ActivityListener, ConnectivityListener, EventFeed, FeedMessage, ListenerHandle};
use crate::error::Error;
use crate::model::ActivityState;

/// History entries retained when no capacity is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// In-memory [`EventFeed`].
///
/// Listeners are invoked synchronously on the publishing thread, in
/// registration order. History is kept most-recent-first and bounded.
#[derive(Clone)]
pub struct MemoryFeed {
    inner: Arc<MemoryFeedInner>,
}

struct MemoryFeedInner {
    connected: AtomicBool,
    history: Mutex<VecDeque<ActivityState>>,
    history_capacity: usize,
    activity_listeners: Mutex<Vec<(u64, ActivityListener)>>,
    connectivity_listeners: Mutex<Vec<(u64, ConnectivityListener)>>,
    next_listener_id: AtomicU64,
}

impl MemoryFeed {
    pub fn new(connected: bool) -> Self {
        Self::with_history_capacity(connected, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(connected: bool, history_capacity: usize) -> Self {
        Self {
            inner: Arc::new(MemoryFeedInner {
                connected: AtomicBool::new(connected),
                history: Mutex::new(VecDeque::with_capacity(history_capacity)),
                history_capacity,
                activity_listeners: Mutex::new(Vec::new()),
                connectivity_listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Append a state to history without delivering it to listeners.
    pub fn record_history(&self, state: ActivityState) {
        let mut history = lock(&self.inner.history);
        if self.inner.history_capacity == 0 {
            return;
        }
        if history.len() == self.inner.history_capacity {
            history.pop_back();
        }
        history.push_front(state);
    }

    /// Deliver a message to every registered listener of its kind.
    ///
    /// Activity states are recorded into history before delivery;
    /// connectivity messages update [`is_connected`](EventFeed::is_connected).
    pub fn publish(&self, message: FeedMessage) {
        match message {
            FeedMessage::Activity(state) => {
                self.record_history(ActivityState::clone(&state));
                let listeners: Vec<ActivityListener> = lock(&self.inner.activity_listeners)
                    .iter()
                    .map(|(_, l)| Arc::clone(l))
                    .collect();
                tracing::trace!(listeners = listeners.len(), "publishing activity state");
                for listener in listeners {
                    listener(Arc::clone(&state));
                }
            }
            FeedMessage::Connectivity(connected) => {
                self.inner.connected.store(connected, Ordering::SeqCst);
                let listeners: Vec<ConnectivityListener> =
                    lock(&self.inner.connectivity_listeners)
                        .iter()
                        .map(|(_, l)| Arc::clone(l))
                        .collect();
                tracing::trace!(connected, listeners = listeners.len(), "publishing connectivity");
                for listener in listeners {
                    listener(connected);
                }
            }
        }
    }

    /// Total registered listeners across both kinds.
    pub fn listener_count(&self) -> usize {
        lock(&self.inner.activity_listeners).len() + lock(&self.inner.connectivity_listeners).len()
    }

    /// Number of states currently retained in history.
    pub fn history_len(&self) -> usize {
        lock(&self.inner.history).len()
    }

    fn next_id(&self) -> u64 {
        self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EventFeed for MemoryFeed {
    fn fetch_history(&self, count: usize) -> BoxFuture<'_, Result<Vec<ActivityState>, Error>> {
        let states: Vec<ActivityState> = lock(&self.inner.history)
            .iter()
            .take(count)
            .cloned()
            .collect();
        future::ready(Ok(states)).boxed()
    }

    fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    fn add_activity_listener(&self, listener: ActivityListener) -> ListenerHandle {
        let id = self.next_id();
        lock(&self.inner.activity_listeners).push((id, listener));

        let weak = Arc::downgrade(&self.inner);
        ListenerHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.activity_listeners).retain(|(lid, _)| *lid != id);
            }
        })
    }

    fn add_connectivity_listener(&self, listener: ConnectivityListener) -> ListenerHandle {
        let id = self.next_id();
        lock(&self.inner.connectivity_listeners).push((id, listener));

        let weak = Arc::downgrade(&self.inner);
        ListenerHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner.connectivity_listeners).retain(|(lid, _)| *lid != id);
            }
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{EventType, SessionLevel, StateMachine};

    fn state(session_id: &str, level: SessionLevel) -> ActivityState {
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
                session_id: session_id.into(),
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
    async fn history_is_most_recent_first_and_bounded() {
        let feed = MemoryFeed::with_history_capacity(true, 2);
        feed.record_history(state("1", SessionLevel::Online));
        feed.record_history(state("2", SessionLevel::Baseline));
        feed.record_history(state("3", SessionLevel::Level1));

        let history = feed.fetch_history(10).await.unwrap();
        let ids: Vec<_> = history
            .iter()
            .map(|s| s.state_machine.session_id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2"]);

        let newest = feed.fetch_history(1).await.unwrap();
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].state_machine.session_id, "3");
    }

    #[test]
    fn publish_delivers_and_records() {
        let feed = MemoryFeed::new(true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _handle = feed.add_activity_listener(Arc::new(move |s: Arc<ActivityState>| {
            sink.lock().unwrap().push(s.state_machine.state);
        }));

        feed.publish(FeedMessage::Activity(Arc::new(state("1", SessionLevel::Level2))));
        feed.publish(FeedMessage::Activity(Arc::new(state("1", SessionLevel::Level3))));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionLevel::Level2, SessionLevel::Level3]
        );
        assert_eq!(feed.history_len(), 2);
    }

    #[test]
    fn connectivity_updates_flag_and_listeners() {
        let feed = MemoryFeed::new(true);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _handle = feed.add_connectivity_listener(Arc::new(move |connected: bool| {
            assert!(!connected);
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        feed.publish(FeedMessage::Connectivity(false));

        assert!(!feed.is_connected());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let feed = MemoryFeed::new(true);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = feed.add_connectivity_listener(Arc::new(move |_: bool| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(feed.listener_count(), 1);

        handle.remove();
        feed.publish(FeedMessage::Connectivity(true));

        assert_eq!(feed.listener_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
