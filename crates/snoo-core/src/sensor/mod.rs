//! Derived sensors.
//!
//! Each sensor is a pure presentation function over a
//! [`SynchronizerSnapshot`]: the same snapshot always yields the same
//! [`Presentation`], and an empty snapshot always yields no value, no
//! attributes, and `available == false`.

mod format;
mod level;
mod session;
mod status;
mod tables;

use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::config::DeviceInfo;
use crate::sync::{Synchronizer, SynchronizerSnapshot};

pub use format::{format_duration, format_timestamp};
pub use level::LevelSensor;
pub use session::{SessionStartAttributes, SessionStartSensor};
pub use status::{StatusAttributes, StatusSensor};
pub use tables::{LevelRow, level_icon, level_name, level_number, level_table};

// ── Sensor trait ─────────────────────────────────────────────────────

/// A read-only view of one observable derived from a synchronizer.
pub trait Sensor: Send + Sync {
    type Value;
    type Attributes;

    fn descriptor(&self) -> &SensorDescriptor;

    fn synchronizer(&self) -> &Synchronizer;

    /// Present `snapshot`. Must be total and side-effect free.
    fn present(
        &self,
        snapshot: &SynchronizerSnapshot,
    ) -> Presentation<Self::Value, Self::Attributes>;

    /// Present the synchronizer's current snapshot.
    fn current(&self) -> Presentation<Self::Value, Self::Attributes> {
        self.present(&self.synchronizer().snapshot())
    }
}

/// What a sensor shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation<V, A> {
    pub value: Option<V>,
    pub icon: Icon,
    /// `None` when there is no activity state to describe.
    pub attributes: Option<A>,
    pub available: bool,
}

// ── Icons ────────────────────────────────────────────────────────────

/// Material Design icon identifiers used by the sensors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, IntoStaticStr,
)]
pub enum Icon {
    #[serde(rename = "mdi:bed-empty")]
    #[strum(serialize = "mdi:bed-empty")]
    BedEmpty,
    #[serde(rename = "mdi:bed")]
    #[strum(serialize = "mdi:bed")]
    Bed,
    #[serde(rename = "mdi:numeric-1-circle")]
    #[strum(serialize = "mdi:numeric-1-circle")]
    Numeric1,
    #[serde(rename = "mdi:numeric-2-circle")]
    #[strum(serialize = "mdi:numeric-2-circle")]
    Numeric2,
    #[serde(rename = "mdi:numeric-3-circle")]
    #[strum(serialize = "mdi:numeric-3-circle")]
    Numeric3,
    #[serde(rename = "mdi:numeric-4-circle")]
    #[strum(serialize = "mdi:numeric-4-circle")]
    Numeric4,
    #[serde(rename = "mdi:alert-decagram")]
    #[strum(serialize = "mdi:alert-decagram")]
    AlertDecagram,
    #[serde(rename = "mdi:sleep")]
    #[strum(serialize = "mdi:sleep")]
    Sleep,
    #[serde(rename = "mdi:sleep-off")]
    #[strum(serialize = "mdi:sleep-off")]
    SleepOff,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

// ── Descriptors ──────────────────────────────────────────────────────

/// Which of the three per-device sensors this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorKind {
    Status,
    Level,
    SessionStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateClass {
    /// Values support statistical aggregation.
    Measurement,
}

/// Host-facing metadata for one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorDescriptor {
    pub kind: SensorKind,
    pub unique_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    pub device: DeviceInfo,
}

impl SensorDescriptor {
    pub fn for_kind(kind: SensorKind, device: &DeviceInfo) -> Self {
        let base_name = device.display_name();
        let serial = &device.serial_number;
        let (unique_id, name) = match kind {
            SensorKind::Status => (serial.clone(), base_name),
            SensorKind::Level => (format!("{serial}_level"), format!("{base_name} Level")),
            SensorKind::SessionStart => (
                format!("{serial}_session_start"),
                format!("{base_name} Session Start"),
            ),
        };
        Self {
            kind,
            unique_id,
            name,
            device_class: (kind == SensorKind::SessionStart).then_some(DeviceClass::Timestamp),
            state_class: (kind == SensorKind::Level).then_some(StateClass::Measurement),
            unit_of_measurement: (kind == SensorKind::Level).then_some("level"),
            device: device.clone(),
        }
    }
}
