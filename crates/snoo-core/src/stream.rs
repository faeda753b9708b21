// ── Reactive snapshot streams ──
//
// Subscription type for consuming synchronizer changes from async code.
// Observers registered with `Synchronizer::subscribe` run synchronously on
// the feed's delivery context; a `SnapshotStream` lets a task await the
// next change instead.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::sync::SynchronizerSnapshot;

/// A subscription to a synchronizer's snapshot.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`. Rapid
/// successive mutations may coalesce; only the latest value is retained.
pub struct SnapshotStream {
    current: SynchronizerSnapshot,
    receiver: watch::Receiver<SynchronizerSnapshot>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<SynchronizerSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &SynchronizerSnapshot {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> SynchronizerSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once every synchronizer handle has been dropped.
    pub async fn changed(&mut self) -> Option<SynchronizerSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the value current at conversion time.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream {
    inner: WatchStream<SynchronizerSnapshot>,
}

impl Stream for SnapshotWatchStream {
    type Item = SynchronizerSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
