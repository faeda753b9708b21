//! State synchronizer.
//!
//! [`Synchronizer`] mirrors one device's event feed into a single
//! [`SynchronizerSnapshot`] and fans every change out to registered
//! observers. See [`Synchronizer::attach`] for the seeding rules.

mod observer;
mod snapshot;
mod synchronizer;

pub use observer::{ObserverError, ObserverResult, Subscription};
pub use snapshot::SynchronizerSnapshot;
pub use synchronizer::{Lifecycle, Synchronizer};
