// ── Activity-state wire model ──
//
// Typed representation of the status messages the bassinet publishes on
// its activity channel. Field codecs live in `crate::wire`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

use crate::wire;

// ── SessionLevel ─────────────────────────────────────────────────────

/// Operating level reported by the device state machine.
///
/// Unknown level strings decode as [`SessionLevel::None`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
pub enum SessionLevel {
    #[serde(rename = "ONLINE")]
    #[strum(serialize = "ONLINE")]
    Online,
    #[serde(rename = "BASELINE")]
    #[strum(serialize = "BASELINE")]
    Baseline,
    #[serde(rename = "WEANING_BASELINE")]
    #[strum(serialize = "WEANING_BASELINE")]
    WeaningBaseline,
    #[serde(rename = "LEVEL1")]
    #[strum(serialize = "LEVEL1")]
    Level1,
    #[serde(rename = "LEVEL2")]
    #[strum(serialize = "LEVEL2")]
    Level2,
    #[serde(rename = "LEVEL3")]
    #[strum(serialize = "LEVEL3")]
    Level3,
    #[serde(rename = "LEVEL4")]
    #[strum(serialize = "LEVEL4")]
    Level4,
    #[serde(rename = "PRETIMEOUT")]
    #[strum(serialize = "PRETIMEOUT")]
    PreTimeout,
    #[serde(rename = "TIMEOUT")]
    #[strum(serialize = "TIMEOUT")]
    Timeout,
    /// Also the fallback for level strings this crate does not know.
    #[serde(rename = "NONE", other)]
    #[strum(serialize = "NONE")]
    None,
}

impl SessionLevel {
    /// Raw wire string, e.g. `"LEVEL2"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether the device is actively soothing at this level.
    pub fn is_active_level(self) -> bool {
        matches!(
            self,
            Self::Level1 | Self::Level2 | Self::Level3 | Self::Level4 | Self::PreTimeout
        )
    }
}

// ── EventType ────────────────────────────────────────────────────────

/// Kind of transition that produced an activity-state message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Activity,
    Cry,
    Timer,
    Command,
    SafetyClip,
    LongActivityPress,
    StatusRequested,
    StickyWhiteNoiseUpdated,
    ConfigChange,
    #[serde(other)]
    Unknown,
}

impl EventType {
    /// Raw wire string, e.g. `"status_requested"`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// ── StateMachine ─────────────────────────────────────────────────────

/// Nested state-machine record carried by every activity state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachine {
    pub state: SessionLevel,

    /// Time spent in the current session at `event_time`.
    #[serde(rename = "since_session_start_ms", with = "wire::optional_millis")]
    pub since_session_start: Option<TimeDelta>,

    #[serde(with = "wire::string_bool")]
    pub is_active_session: bool,

    /// Stable for the lifetime of one session.
    #[serde(deserialize_with = "wire::string_or_number::deserialize")]
    pub session_id: String,

    pub up_transition: SessionLevel,
    pub down_transition: SessionLevel,

    #[serde(with = "wire::on_off")]
    pub hold: bool,

    #[serde(with = "wire::on_off")]
    pub audio: bool,

    #[serde(with = "wire::on_off")]
    pub sticky_white_noise: bool,

    #[serde(with = "wire::on_off")]
    pub weaning: bool,

    /// Remaining time on the current level's timer.
    #[serde(default, with = "wire::optional_seconds")]
    pub time_left: Option<TimeDelta>,
}

// ── ActivityState ────────────────────────────────────────────────────

/// One timestamped snapshot of the device's operating status.
///
/// Immutable once received: the synchronizer replaces it wholesale on the
/// next event and never merges fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    #[serde(with = "wire::int_bool")]
    pub left_safety_clip: bool,

    #[serde(with = "wire::int_bool")]
    pub right_safety_clip: bool,

    /// Firmware version reported alongside the state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,

    pub event: EventType,

    #[serde(rename = "event_time_ms", with = "chrono::serde::ts_milliseconds")]
    pub event_time: DateTime<Utc>,

    pub state_machine: StateMachine,

    /// Opaque diagnostic string, e.g. `"normal"`.
    pub system_state: String,
}

impl ActivityState {
    /// Absolute session start, when the state carries an active session.
    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        if !self.state_machine.is_active_session {
            return None;
        }
        let elapsed = self.state_machine.since_session_start?;
        self.event_time.checked_sub_signed(elapsed)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "left_safety_clip": 1,
            "right_safety_clip": 0,
            "sw_version": "v1.14.12",
            "event": "activity",
            "event_time_ms": 1_620_000_600_000_i64,
            "system_state": "normal",
            "state_machine": {
                "state": "LEVEL2",
                "up_transition": "LEVEL3",
                "down_transition": "LEVEL1",
                "since_session_start_ms": 600_000,
                "is_active_session": "true",
                "session_id": "1234",
                "hold": "off",
                "audio": "on",
                "sticky_white_noise": "off",
                "weaning": "off",
                "time_left": 240
            }
        })
    }

    #[test]
    fn deserialize_activity_state() {
        let state: ActivityState = serde_json::from_value(sample_json()).unwrap();

        assert!(state.left_safety_clip);
        assert!(!state.right_safety_clip);
        assert_eq!(state.event, EventType::Activity);
        assert_eq!(
            state.event_time,
            Utc.timestamp_millis_opt(1_620_000_600_000).unwrap()
        );
        assert_eq!(state.state_machine.state, SessionLevel::Level2);
        assert_eq!(state.state_machine.up_transition, SessionLevel::Level3);
        assert_eq!(
            state.state_machine.since_session_start,
            Some(TimeDelta::minutes(10))
        );
        assert!(state.state_machine.is_active_session);
        assert_eq!(state.state_machine.session_id, "1234");
        assert!(state.state_machine.audio);
        assert_eq!(state.state_machine.time_left, Some(TimeDelta::seconds(240)));
        assert_eq!(state.sw_version.as_deref(), Some("v1.14.12"));
    }

    #[test]
    fn unknown_level_falls_back_to_none() {
        let mut json = sample_json();
        json["state_machine"]["state"] = "LEVEL9".into();
        let state: ActivityState = serde_json::from_value(json).unwrap();
        assert_eq!(state.state_machine.state, SessionLevel::None);
    }

    #[test]
    fn explicit_none_decodes() {
        let mut json = sample_json();
        json["state_machine"]["up_transition"] = "NONE".into();
        json["state_machine"]["down_transition"] = "".into();
        let state: ActivityState = serde_json::from_value(json).unwrap();
        assert_eq!(state.state_machine.up_transition, SessionLevel::None);
        assert_eq!(state.state_machine.down_transition, SessionLevel::None);
        assert_eq!(SessionLevel::iter().last(), Some(SessionLevel::None));
    }

    #[test]
    fn unknown_event_is_captured() {
        let mut json = sample_json();
        json["event"] = "firmware_party".into();
        let state: ActivityState = serde_json::from_value(json).unwrap();
        assert_eq!(state.event, EventType::Unknown);
    }

    #[test]
    fn numeric_session_id_is_stringified() {
        let mut json = sample_json();
        json["state_machine"]["session_id"] = 987_654.into();
        let state: ActivityState = serde_json::from_value(json).unwrap();
        assert_eq!(state.state_machine.session_id, "987654");
    }

    #[test]
    fn session_start_subtracts_elapsed_time() {
        let state: ActivityState = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(
            state.session_start(),
            Some(Utc.timestamp_millis_opt(1_620_000_000_000).unwrap())
        );
    }

    #[test]
    fn session_start_absent_outside_session() {
        let mut json = sample_json();
        json["state_machine"]["is_active_session"] = "false".into();
        let state: ActivityState = serde_json::from_value(json).unwrap();
        assert_eq!(state.session_start(), None);
    }

    #[test]
    fn level_wire_names_match_serde() {
        for level in SessionLevel::iter() {
            let encoded = serde_json::to_value(level).unwrap();
            assert_eq!(encoded, level.as_str());
        }
    }

    #[test]
    fn active_levels() {
        let active: Vec<_> = SessionLevel::iter().filter(|l| l.is_active_level()).collect();
        assert_eq!(
            active,
            vec![
                SessionLevel::Level1,
                SessionLevel::Level2,
                SessionLevel::Level3,
                SessionLevel::Level4,
                SessionLevel::PreTimeout,
            ]
        );
    }
}
