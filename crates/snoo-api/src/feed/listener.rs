use std::fmt;
use std::sync::{Mutex, PoisonError};

type RemoveFn = Box<dyn FnOnce() + Send>;

/// Removable registration returned by [`EventFeed`](super::EventFeed)
/// listener methods.
///
/// `remove()` runs the feed's removal hook at most once, no matter how
/// many times it is called. Dropping the handle removes the listener.
pub struct ListenerHandle {
    remove: Mutex<Option<RemoveFn>>,
}

impl ListenerHandle {
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Mutex::new(Some(Box::new(remove))),
        }
    }

    /// A handle with nothing to remove.
    pub fn noop() -> Self {
        Self {
            remove: Mutex::new(None),
        }
    }

    /// Unregister the listener. Idempotent.
    pub fn remove(&self) {
        let hook = self
            .remove
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Whether the listener is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.remove
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn remove_runs_hook_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = ListenerHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(handle.is_active());
        handle.remove();
        handle.remove();
        drop(handle);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_removes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        drop(ListenerHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn noop_is_inactive() {
        let handle = ListenerHandle::noop();
        assert!(!handle.is_active());
        handle.remove();
    }
}
