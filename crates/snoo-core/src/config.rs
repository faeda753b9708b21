// ── Runtime device configuration ──
//
// These types describe *which* device a synchronizer mirrors and how it
// seeds itself. They never touch disk: the binary builds them from its
// profile file (see `snoo-config`) and hands them in.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Manufacturer reported for every bassinet.
pub const MANUFACTURER: &str = "Snoo";

/// Synchronizer tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Number of historical activity states requested on attach. Only the
    /// most recent one is used to seed the snapshot; 0 skips seeding.
    pub history_count: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { history_count: 1 }
    }
}

/// Identity of one bassinet and the baby it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub serial_number: String,
    pub baby_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    pub fn new(serial_number: impl Into<String>, baby_name: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            baby_name: baby_name.into(),
            firmware_version: None,
        }
    }

    pub fn with_firmware_version(mut self, version: impl Into<String>) -> Self {
        self.firmware_version = Some(version.into());
        self
    }

    /// `"{baby}'s Snoo"`, the name the device and its main sensor go by.
    pub fn display_name(&self) -> String {
        format!("{}'s Snoo", self.baby_name)
    }

    pub fn manufacturer(&self) -> &'static str {
        MANUFACTURER
    }

    /// Reject identities that would produce empty sensor ids or names.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.serial_number.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device serial number must not be empty".into(),
            });
        }
        if self.baby_name.trim().is_empty() {
            return Err(CoreError::Config {
                message: "baby name must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_history_count_is_one() {
        assert_eq!(SyncConfig::default().history_count, 1);
    }

    #[test]
    fn display_name_uses_baby_name() {
        let device = DeviceInfo::new("SN123", "Ada");
        assert_eq!(device.display_name(), "Ada's Snoo");
        assert_eq!(device.manufacturer(), "Snoo");
    }

    #[test]
    fn blank_identity_is_rejected() {
        assert!(DeviceInfo::new(" ", "Ada").validate().is_err());
        assert!(DeviceInfo::new("SN123", "").validate().is_err());
        assert!(DeviceInfo::new("SN123", "Ada").validate().is_ok());
    }
}
