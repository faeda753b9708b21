use chrono::{DateTime, Utc};
use serde::Serialize;
use snoo_api::ActivityState;

use super::format::{format_duration, format_timestamp};
use super::{Icon, Presentation, Sensor, SensorDescriptor, SensorKind};
use crate::config::DeviceInfo;
use crate::sync::{Synchronizer, SynchronizerSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStartAttributes {
    pub event_time: String,
    pub since_session_start: Option<String>,
    pub is_active_session: bool,
    pub session_id: String,
}

impl From<&ActivityState> for SessionStartAttributes {
    fn from(activity: &ActivityState) -> Self {
        Self {
            event_time: format_timestamp(activity.event_time),
            since_session_start: activity
                .state_machine
                .since_session_start
                .map(format_duration),
            is_active_session: activity.state_machine.is_active_session,
            session_id: activity.state_machine.session_id.clone(),
        }
    }
}

/// Absolute start time of the running session.
#[derive(Debug, Clone)]
pub struct SessionStartSensor {
    descriptor: SensorDescriptor,
    synchronizer: Synchronizer,
}

impl SessionStartSensor {
    pub fn new(synchronizer: Synchronizer, device: &DeviceInfo) -> Self {
        Self {
            descriptor: SensorDescriptor::for_kind(SensorKind::SessionStart, device),
            synchronizer,
        }
    }
}

impl Sensor for SessionStartSensor {
    type Value = DateTime<Utc>;
    type Attributes = SessionStartAttributes;

    fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    fn present(
        &self,
        snapshot: &SynchronizerSnapshot,
    ) -> Presentation<DateTime<Utc>, SessionStartAttributes> {
        let activity = snapshot.activity();
        // Keyed on the level, not the session flag.
        let soothing = activity.is_some_and(|a| a.state_machine.state.is_active_level());
        Presentation {
            value: activity.and_then(ActivityState::session_start),
            icon: if soothing { Icon::Sleep } else { Icon::SleepOff },
            attributes: activity.map(SessionStartAttributes::from),
            available: snapshot.is_available(),
        }
    }
}
