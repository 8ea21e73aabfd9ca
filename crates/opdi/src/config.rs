//! CLI configuration: thin wrapper around `opdi_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --device, --timeout, --strict-tls, --config).

use std::path::PathBuf;

use opdi_core::SyncConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use opdi_config::{Config, DeviceEntry, device_to_sync_config};

/// Config file in effect: `--config` / `OPDI_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(opdi_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(opdi_config::load_config_from(&config_path(global))?)
}

pub fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    opdi_config::save_config_to(cfg, &config_path(global))?;
    Ok(())
}

/// Resolve the device to talk to and translate it into a `SyncConfig`.
///
/// `--url` wins over any configured device; the remaining flags override
/// the chosen entry field by field.
pub fn resolve_sync_config(global: &GlobalOpts) -> Result<SyncConfig, CliError> {
    let cfg = load(global)?;

    let mut entry = if let Some(ref url) = global.url {
        let base = global
            .device
            .as_deref()
            .and_then(|name| cfg.devices.get(name))
            .cloned()
            .unwrap_or_default();
        DeviceEntry {
            url: url.clone(),
            ..base
        }
    } else {
        match cfg.device(global.device.as_deref()) {
            Ok((_, entry)) => entry.clone(),
            Err(opdi_config::ConfigError::UnknownDevice { name }) => {
                let names: Vec<_> = cfg.devices.keys().map(String::as_str).collect();
                return Err(CliError::UnknownDevice {
                    name,
                    available: names.join(", "),
                });
            }
            Err(opdi_config::ConfigError::NoDevice) => {
                return Err(CliError::NoConfig {
                    path: config_path(global).display().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    };

    if let Some(timeout) = global.timeout {
        entry.timeout = Some(timeout);
    }
    if global.strict_tls {
        entry.strict_tls = Some(true);
    }

    Ok(device_to_sync_config(&entry, &cfg.defaults)?)
}
