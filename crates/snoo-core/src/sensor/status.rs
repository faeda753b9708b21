use serde::Serialize;
use snoo_api::ActivityState;

use super::format::format_duration;
use super::tables::{level_icon, level_name};
use super::{Presentation, Sensor, SensorDescriptor, SensorKind};
use crate::config::DeviceInfo;
use crate::sync::{Synchronizer, SynchronizerSnapshot};

/// Every field of the state machine plus the top-level flags, verbatim.
/// Enums appear as their wire strings, durations in `H:MM:SS` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusAttributes {
    pub raw_state: &'static str,
    pub up_transition: &'static str,
    pub down_transition: &'static str,
    pub since_session_start: Option<String>,
    pub is_active_session: bool,
    pub session_id: String,
    pub hold: bool,
    pub audio: bool,
    pub sticky_white_noise: bool,
    pub weaning: bool,
    pub time_left: Option<String>,
    pub left_safety_clip: bool,
    pub right_safety_clip: bool,
    pub system_state: String,
    pub last_event: &'static str,
}

impl From<&ActivityState> for StatusAttributes {
    fn from(activity: &ActivityState) -> Self {
        let machine = &activity.state_machine;
        Self {
            raw_state: machine.state.as_str(),
            up_transition: machine.up_transition.as_str(),
            down_transition: machine.down_transition.as_str(),
            since_session_start: machine.since_session_start.map(format_duration),
            is_active_session: machine.is_active_session,
            session_id: machine.session_id.clone(),
            hold: machine.hold,
            audio: machine.audio,
            sticky_white_noise: machine.sticky_white_noise,
            weaning: machine.weaning,
            time_left: machine.time_left.map(format_duration),
            left_safety_clip: activity.left_safety_clip,
            right_safety_clip: activity.right_safety_clip,
            system_state: activity.system_state.clone(),
            last_event: activity.event.as_str(),
        }
    }
}

/// The device's main sensor: current level name.
#[derive(Debug, Clone)]
pub struct StatusSensor {
    descriptor: SensorDescriptor,
    synchronizer: Synchronizer,
}

impl StatusSensor {
    pub fn new(synchronizer: Synchronizer, device: &DeviceInfo) -> Self {
        Self {
            descriptor: SensorDescriptor::for_kind(SensorKind::Status, device),
            synchronizer,
        }
    }
}

impl Sensor for StatusSensor {
    type Value = &'static str;
    type Attributes = StatusAttributes;

    fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    fn present(
        &self,
        snapshot: &SynchronizerSnapshot,
    ) -> Presentation<&'static str, StatusAttributes> {
        let activity = snapshot.activity();
        let level = activity.map(|a| a.state_machine.state);
        Presentation {
            value: level.and_then(level_name),
            icon: level_icon(level.unwrap_or(snoo_api::SessionLevel::None)),
            attributes: activity.map(StatusAttributes::from),
            available: snapshot.is_available(),
        }
    }
}
