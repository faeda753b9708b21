//! State synchronization and derived sensors for a SNOO smart bassinet.
//!
//! - **[`Synchronizer`]**: subscribes to one device's
//!   [`EventFeed`](snoo_api::EventFeed), replays the most recent history
//!   entry on [`attach()`](Synchronizer::attach), and keeps a single
//!   [`SynchronizerSnapshot`] current. Observers registered with
//!   [`subscribe()`](Synchronizer::subscribe) are told after every change.
//!
//! - **[`SnapshotStream`]**: `watch`-backed async view of the same
//!   snapshot. Exposes `current()` / `latest()` / `changed()`.
//!
//! - **Sensors** ([`sensor`]): pure presentation functions for the level
//!   name, level number, and session start time.
//!
//! - **[`DeviceHub`]**: owns one synchronizer and its three sensors, and
//!   manages re-render bindings for a host.

pub mod config;
pub mod error;
pub mod hub;
pub mod sensor;
pub mod stream;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceInfo, MANUFACTURER, SyncConfig};
pub use error::CoreError;
pub use hub::{DeviceHub, SensorBinding};
pub use sensor::{
    Icon, LevelSensor, Presentation, Sensor, SensorDescriptor, SensorKind, SessionStartAttributes,
    SessionStartSensor, StatusAttributes, StatusSensor,
};
pub use stream::{SnapshotStream, SnapshotWatchStream};
pub use sync::{
    Lifecycle, ObserverError, ObserverResult, Subscription, Synchronizer, SynchronizerSnapshot,
};
