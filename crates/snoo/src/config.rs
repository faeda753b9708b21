//! CLI configuration: thin wrapper around `snoo_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` and replay flag overrides
//! (`--config`, `--device`, `--serial`, `--baby`).

use std::path::PathBuf;

use snoo_config::{Config, RuntimeDevice};
use snoo_core::{DeviceInfo, SyncConfig};

use crate::cli::{GlobalOpts, ReplayArgs};
use crate::error::CliError;

/// Config file in effect: `--config` / `SNOO_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(snoo_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(snoo_config::load_config_from(&config_path(global))?)
}

/// Resolve the device a replay should present.
///
/// An explicitly requested profile (`--device`) must exist. Otherwise the
/// config's default profile is used when present, and `--serial` /
/// `--baby` override whatever the profile says.
pub fn resolve_device(
    global: &GlobalOpts,
    config: &Config,
    args: &ReplayArgs,
) -> Result<RuntimeDevice, CliError> {
    let profile = match global.device.as_deref() {
        Some(name) => Some(config.device(name)?),
        None => config
            .default_device
            .as_deref()
            .and_then(|name| config.devices.get(name)),
    };

    let mut runtime = match profile {
        Some(profile) => snoo_config::device_to_runtime(profile, &config.defaults)?,
        None => {
            let serial = args.serial.as_deref().ok_or_else(|| CliError::NoDevice {
                path: config_path(global).display().to_string(),
            })?;
            RuntimeDevice {
                device: DeviceInfo::new(serial, args.baby.as_deref().unwrap_or("Baby")),
                sync: SyncConfig {
                    history_count: config.defaults.history_count,
                },
            }
        }
    };

    if let Some(ref serial) = args.serial {
        runtime.device.serial_number.clone_from(serial);
    }
    if let Some(ref baby) = args.baby {
        runtime.device.baby_name.clone_from(baby);
    }
    runtime
        .device
        .validate()
        .map_err(|e| CliError::Validation {
            field: "device".into(),
            reason: e.to_string(),
        })?;

    tracing::debug!(
        serial = %runtime.device.serial_number,
        history_count = runtime.sync.history_count,
        "resolved device"
    );
    Ok(runtime)
}
