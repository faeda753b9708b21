use std::error::Error as StdError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::synchronizer::SyncInner;

/// Error an observer may report. Logged by the synchronizer and otherwise
/// ignored.
pub type ObserverError = Box<dyn StdError + Send + Sync>;

/// Return type of an observer callback.
pub type ObserverResult = Result<(), ObserverError>;

pub(crate) type ObserverFn = Arc<dyn Fn() -> ObserverResult + Send + Sync>;

pub(crate) struct ObserverEntry {
    pub(crate) id: u64,
    pub(crate) active: Arc<AtomicBool>,
    pub(crate) callback: ObserverFn,
}

/// Registration returned by [`Synchronizer::subscribe`](super::Synchronizer::subscribe).
///
/// Dropping a `Subscription` does *not* unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe), which is idempotent.
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    inner: Weak<SyncInner>,
}

impl Subscription {
    pub(crate) fn new(id: u64, active: Arc<AtomicBool>, inner: Weak<SyncInner>) -> Self {
        Self { id, active, inner }
    }

    /// Remove this observer. Only the first call has any effect; an
    /// in-flight notification will skip the observer from here on.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.remove_observer(self.id);
        }
        tracing::debug!(observer = self.id, "observer unsubscribed");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
