use snoo_api::SessionLevel;

use super::tables::{level_icon, level_number};
use super::{Presentation, Sensor, SensorDescriptor, SensorKind};
use crate::config::DeviceInfo;
use crate::sync::{Synchronizer, SynchronizerSnapshot};

/// Current level as a number, for graphing and statistics.
#[derive(Debug, Clone)]
pub struct LevelSensor {
    descriptor: SensorDescriptor,
    synchronizer: Synchronizer,
}

impl LevelSensor {
    pub fn new(synchronizer: Synchronizer, device: &DeviceInfo) -> Self {
        Self {
            descriptor: SensorDescriptor::for_kind(SensorKind::Level, device),
            synchronizer,
        }
    }
}

impl Sensor for LevelSensor {
    type Value = f64;
    type Attributes = ();

    fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    fn present(&self, snapshot: &SynchronizerSnapshot) -> Presentation<f64, ()> {
        let level = snapshot.activity().map(|a| a.state_machine.state);
        Presentation {
            value: level.and_then(level_number),
            icon: level_icon(level.unwrap_or(SessionLevel::None)),
            attributes: None,
            available: snapshot.is_available(),
        }
    }
}
