//! Event feed interface.
//!
//! The transport (PubNub subscription, reconnects, delivery guarantees)
//! lives outside this crate. Anything that can deliver ordered activity
//! states and connectivity changes for one device implements
//! [`EventFeed`]; the synchronizer in `snoo-core` only ever talks to this
//! trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snoo_api::feed::{EventFeed, MemoryFeed};
//!
//! let feed = MemoryFeed::new(true);
//! let handle = feed.add_connectivity_listener(Arc::new(|connected| {
//!     println!("connected: {connected}");
//! }));
//!
//! feed.publish(snoo_api::FeedMessage::Connectivity(false));
//! handle.remove();
//! ```

mod listener;
mod memory;
mod record;

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::model::ActivityState;

pub use listener::ListenerHandle;
pub use memory::{DEFAULT_HISTORY_CAPACITY, MemoryFeed};
pub use record::parse_record;

/// Callback receiving each activity state, in delivery order.
pub type ActivityListener = Arc<dyn Fn(Arc<ActivityState>) + Send + Sync>;

/// Callback receiving each connectivity change.
pub type ConnectivityListener = Arc<dyn Fn(bool) + Send + Sync>;

/// A typed feed event, as handed to the synchronizer's mutation entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Activity(Arc<ActivityState>),
    Connectivity(bool),
}

/// Push-based event source for a single device.
pub trait EventFeed: Send + Sync {
    /// Fetch up to `count` recent activity states, **most recent first**.
    fn fetch_history(&self, count: usize) -> BoxFuture<'_, Result<Vec<ActivityState>, Error>>;

    /// Last known transport connectivity.
    fn is_connected(&self) -> bool;

    /// Register an activity-state listener. Dropping the handle removes it.
    fn add_activity_listener(&self, listener: ActivityListener) -> ListenerHandle;

    /// Register a connectivity listener. Dropping the handle removes it.
    fn add_connectivity_listener(&self, listener: ConnectivityListener) -> ListenerHandle;
}
