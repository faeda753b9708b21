use std::sync::Arc;

use serde::Serialize;
use snoo_api::ActivityState;

/// The synchronizer's current view of a device: latest activity state (if
/// any) plus last known connectivity.
///
/// Cheap to clone. Observers only ever see copies of this, never the
/// synchronizer's own storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SynchronizerSnapshot {
    pub activity: Option<Arc<ActivityState>>,
    pub connected: bool,
}

impl SynchronizerSnapshot {
    pub fn new(activity: Option<Arc<ActivityState>>, connected: bool) -> Self {
        Self {
            activity,
            connected,
        }
    }

    /// Derived sensors are available only with connectivity *and* data.
    pub fn is_available(&self) -> bool {
        self.connected && self.activity.is_some()
    }

    pub fn activity(&self) -> Option<&ActivityState> {
        self.activity.as_deref()
    }
}
