//! Shared configuration for snoo tools.
//!
//! TOML device profiles, figment layering (defaults, file, `SNOO_` env),
//! and translation to `snoo_core::{DeviceInfo, SyncConfig}`. The core
//! crate never reads files; this crate is the only place that does.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use snoo_core::{DeviceInfo, SyncConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("device profile '{name}' not found")]
    UnknownDevice { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when no `--device` is given.
    pub default_device: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_device: Some("default".into()),
            defaults: Defaults::default(),
            devices: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_history_count")]
    pub history_count: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            history_count: default_history_count(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_history_count() -> usize {
    SyncConfig::default().history_count
}

/// One bassinet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceProfile {
    pub serial_number: String,

    pub baby_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,

    /// Override `defaults.history_count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_count: Option<usize>,
}

impl Config {
    /// Look up a profile by name.
    pub fn device(&self, name: &str) -> Result<&DeviceProfile, ConfigError> {
        self.devices
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDevice {
                name: name.into(),
                available: self.devices.keys().cloned().collect(),
            })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "snoo", "snoo").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("snoo");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` + environment.
///
/// Nested keys in the environment use a double underscore, e.g.
/// `SNOO_DEFAULTS__HISTORY_COUNT=5` or `SNOO_DEFAULT_DEVICE=nursery`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SNOO_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load from the canonical config path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Runtime translation ─────────────────────────────────────────────

/// A profile resolved into the types `snoo-core` consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDevice {
    pub device: DeviceInfo,
    pub sync: SyncConfig,
}

/// Validate a profile and build its runtime configuration.
pub fn device_to_runtime(
    profile: &DeviceProfile,
    defaults: &Defaults,
) -> Result<RuntimeDevice, ConfigError> {
    if profile.serial_number.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "serial_number".into(),
            reason: "must not be empty".into(),
        });
    }
    if profile.baby_name.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "baby_name".into(),
            reason: "must not be empty".into(),
        });
    }

    let mut device = DeviceInfo::new(profile.serial_number.trim(), profile.baby_name.trim());
    device.firmware_version.clone_from(&profile.firmware_version);

    Ok(RuntimeDevice {
        device,
        sync: SyncConfig {
            history_count: profile.history_count.unwrap_or(defaults.history_count),
        },
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_device = "nursery"

[defaults]
output = "json"
history_count = 3

[devices.nursery]
serial_number = "SN100"
baby_name = "Ada"
firmware_version = "v1.14.12"

[devices.grandma]
serial_number = "SN200"
baby_name = "Ada"
history_count = 1
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_from_file() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_device.as_deref(), Some("nursery"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.devices.len(), 2);
        assert_eq!(cfg.device("nursery").unwrap().serial_number, "SN100");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults, Defaults::default());
        assert!(cfg.devices.is_empty());
    }

    #[test]
    fn unknown_device_lists_alternatives() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        match cfg.device("attic") {
            Err(ConfigError::UnknownDevice { name, available }) => {
                assert_eq!(name, "attic");
                assert_eq!(available, vec!["grandma".to_owned(), "nursery".to_owned()]);
            }
            other => panic!("expected UnknownDevice, got {other:?}"),
        }
    }

    #[test]
    fn runtime_inherits_default_history_count() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        let nursery = device_to_runtime(cfg.device("nursery").unwrap(), &cfg.defaults).unwrap();
        assert_eq!(nursery.sync.history_count, 3);
        assert_eq!(nursery.device.display_name(), "Ada's Snoo");
        assert_eq!(nursery.device.firmware_version.as_deref(), Some("v1.14.12"));

        let grandma = device_to_runtime(cfg.device("grandma").unwrap(), &cfg.defaults).unwrap();
        assert_eq!(grandma.sync.history_count, 1);
    }

    #[test]
    fn blank_serial_is_rejected() {
        let profile = DeviceProfile {
            serial_number: "  ".into(),
            baby_name: "Ada".into(),
            firmware_version: None,
            history_count: None,
        };
        let err = device_to_runtime(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "serial_number"));
    }

    #[test]
    fn serializes_back_to_toml() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let text = cfg.to_toml().unwrap();
        assert!(text.contains("[devices.nursery]"));
        assert!(text.contains("serial_number = \"SN100\""));
    }
}
