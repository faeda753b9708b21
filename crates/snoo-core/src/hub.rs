// ── Device hub ──
//
// Explicit ownership of everything one configured device needs: its
// synchronizer and the three sensors built on it. The host holds a hub per
// device and hands sensors out from it; nothing is looked up globally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use snoo_api::EventFeed;
use tracing::{debug, info};

use crate::config::{DeviceInfo, SyncConfig};
use crate::error::CoreError;
use crate::sensor::{LevelSensor, Sensor, SessionStartSensor, StatusSensor};
use crate::sync::{ObserverResult, Subscription, Synchronizer, SynchronizerSnapshot};

/// One device: a synchronizer plus its derived sensors.
pub struct DeviceHub {
    device: DeviceInfo,
    synchronizer: Synchronizer,
    status: StatusSensor,
    level: LevelSensor,
    session_start: SessionStartSensor,
    unloading: AtomicBool,
}

impl DeviceHub {
    pub fn new(device: DeviceInfo, feed: Arc<dyn EventFeed>, config: SyncConfig) -> Self {
        let synchronizer = Synchronizer::new(feed, config);
        Self {
            status: StatusSensor::new(synchronizer.clone(), &device),
            level: LevelSensor::new(synchronizer.clone(), &device),
            session_start: SessionStartSensor::new(synchronizer.clone(), &device),
            device,
            synchronizer,
            unloading: AtomicBool::new(false),
        }
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    pub fn status_sensor(&self) -> &StatusSensor {
        &self.status
    }

    pub fn level_sensor(&self) -> &LevelSensor {
        &self.level
    }

    pub fn session_start_sensor(&self) -> &SessionStartSensor {
        &self.session_start
    }

    pub fn is_unloading(&self) -> bool {
        self.unloading.load(Ordering::SeqCst)
    }

    /// Attach the synchronizer. Call once, before binding sensors.
    pub async fn start(&self) -> Result<SynchronizerSnapshot, CoreError> {
        if self.is_unloading() {
            return Err(CoreError::Detached);
        }
        let snapshot = self.synchronizer.attach().await?;
        info!(
            serial = %self.device.serial_number,
            name = %self.device.display_name(),
            "device hub started"
        );
        Ok(snapshot)
    }

    /// Register `rerender` to run whenever `sensor`'s synchronizer changes.
    pub fn bind<S, F>(&self, sensor: &S, rerender: F) -> Result<SensorBinding, CoreError>
    where
        S: Sensor,
        F: Fn() -> ObserverResult + Send + Sync + 'static,
    {
        if self.is_unloading() {
            return Err(CoreError::Detached);
        }
        let unique_id = sensor.descriptor().unique_id.clone();
        debug!(sensor = %unique_id, "binding sensor");
        let subscription = sensor.synchronizer().subscribe(rerender);
        Ok(SensorBinding {
            unique_id,
            subscription,
        })
    }

    /// Detach the synchronizer and refuse further binds. Idempotent.
    pub fn shutdown(&self) {
        if self.unloading.swap(true, Ordering::SeqCst) {
            debug!("hub already shut down");
            return;
        }
        self.synchronizer.detach();
        info!(serial = %self.device.serial_number, "device hub shut down");
    }
}

impl std::fmt::Debug for DeviceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHub")
            .field("device", &self.device)
            .field("synchronizer", &self.synchronizer)
            .field("unloading", &self.is_unloading())
            .finish_non_exhaustive()
    }
}

/// A sensor's re-render trigger, registered with its synchronizer.
#[derive(Debug)]
pub struct SensorBinding {
    unique_id: String,
    subscription: Subscription,
}

impl SensorBinding {
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Unsubscribe the trigger. Only the first call has any effect.
    pub fn release(&self) {
        if self.subscription.is_active() {
            debug!(sensor = %self.unique_id, "releasing sensor binding");
        }
        self.subscription.unsubscribe();
    }

    pub fn is_bound(&self) -> bool {
        self.subscription.is_active()
    }
}
