//! Wire model and event feed boundary for a SNOO smart bassinet.
//!
//! - **[`model`]**: typed activity-state messages as the device publishes
//!   them on its activity channel, with tolerant field codecs.
//! - **[`feed`]**: the [`EventFeed`] trait the synchronizer consumes,
//!   removable [`ListenerHandle`]s, an in-process [`MemoryFeed`], and
//!   [`parse_record`] for recorded JSON-lines sessions.

pub mod error;
pub mod feed;
pub mod model;
mod wire;

pub use error::Error;
pub use feed::{
    ActivityListener, ConnectivityListener, EventFeed, FeedMessage, ListenerHandle, MemoryFeed,
    parse_record,
};
pub use model::{ActivityState, EventType, SessionLevel, StateMachine};
