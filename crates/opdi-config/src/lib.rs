//! Shared configuration for OPDI device tools.
//!
//! TOML device entries, environment overrides, and translation to
//! `opdi_core::SyncConfig`. The CLI layers its `GlobalOpts` flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use opdi_core::{ReconnectPolicy, SyncConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("device '{name}' is not configured")]
    UnknownDevice { name: String },

    #[error("no device configured; pass --url or add one with `opdi config init`")]
    NoDevice,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Device used when none is named on the command line.
    pub default_device: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named devices.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceEntry>,
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Periodic status poll, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_reconnect_base_ms")]
    pub reconnect_base_ms: u64,

    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            reconnect_base_ms: default_reconnect_base_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval_ms() -> u64 {
    5000
}
fn default_reconnect_base_ms() -> u64 {
    1000
}
fn default_reconnect_max_ms() -> u64 {
    15_000
}

/// A named device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceEntry {
    /// Device root URL (e.g., "http://192.168.4.1").
    pub url: String,

    /// Event stream path override.
    pub stream_path: Option<String>,

    /// Path to a custom CA certificate (HTTPS firmware builds).
    pub ca_cert: Option<PathBuf>,

    /// Verify TLS against the system store instead of accepting any cert.
    pub strict_tls: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override status poll cadence (milliseconds).
    pub poll_interval_ms: Option<u64>,

    /// Disable the event stream and rely on polling alone.
    pub stream: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "opdi", "opdi").map_or_else(
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
    p.push("opdi");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `OPDI_`-prefixed variables override file values; nested keys use a
/// double underscore (`OPDI_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("OPDI_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, cfg.to_toml()?)?;
    Ok(())
}

// ── Device resolution ───────────────────────────────────────────────

impl Config {
    /// Render as the TOML document `save_config_to` writes.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pick the named device, or the default one.
    pub fn device(&self, name: Option<&str>) -> Result<(&str, &DeviceEntry), ConfigError> {
        let name = match name {
            Some(name) => name,
            None => self.default_device.as_deref().ok_or(ConfigError::NoDevice)?,
        };
        self.devices
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| {
                if self.devices.is_empty() {
                    ConfigError::NoDevice
                } else {
                    ConfigError::UnknownDevice { name: name.into() }
                }
            })
    }
}

/// Build a `SyncConfig` from a device entry plus global defaults.
pub fn device_to_sync_config(
    device: &DeviceEntry,
    defaults: &Defaults,
) -> Result<SyncConfig, ConfigError> {
    let url: url::Url = device.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", device.url),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }

    let poll_interval_ms = device.poll_interval_ms.unwrap_or(defaults.poll_interval_ms);
    if poll_interval_ms == 0 {
        return Err(ConfigError::Validation {
            field: "poll_interval_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }
    if defaults.reconnect_base_ms == 0 || defaults.reconnect_max_ms < defaults.reconnect_base_ms {
        return Err(ConfigError::Validation {
            field: "reconnect_base_ms".into(),
            reason: format!(
                "need 0 < base ({}) <= max ({})",
                defaults.reconnect_base_ms, defaults.reconnect_max_ms
            ),
        });
    }

    let tls = if let Some(ref ca_path) = device.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if device.strict_tls.unwrap_or(false) {
        TlsVerification::SystemDefaults
    } else {
        TlsVerification::DangerAcceptInvalid // devices serve self-signed certs
    };

    let mut config = SyncConfig::new(url);
    if let Some(ref path) = device.stream_path {
        config.stream_path.clone_from(path);
    }
    config.tls = tls;
    config.timeout = Duration::from_secs(device.timeout.unwrap_or(defaults.timeout));
    config.poll_interval = Duration::from_millis(poll_interval_ms);
    config.reconnect = ReconnectPolicy {
        base_delay: Duration::from_millis(defaults.reconnect_base_ms),
        max_delay: Duration::from_millis(defaults.reconnect_max_ms),
    };
    config.stream_enabled = device.stream.unwrap_or(true);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(url: &str) -> DeviceEntry {
        DeviceEntry {
            url: url.into(),
            ..DeviceEntry::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_device.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.poll_interval_ms, 5000);
        assert!(cfg.devices.is_empty());
    }

    #[test]
    fn loads_devices_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_device = "porch"

[defaults]
output = "json"
poll_interval_ms = 2000

[devices.porch]
url = "http://192.168.4.1"
stream = false

[devices.lab]
url = "https://10.0.0.20"
ca_cert = "/etc/opdi/ca.pem"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.poll_interval_ms, 2000);
        assert_eq!(cfg.defaults.timeout, 10);

        let (name, porch) = cfg.device(None).unwrap();
        assert_eq!(name, "porch");
        assert_eq!(porch.stream, Some(false));
        assert_eq!(
            cfg.device(Some("lab")).unwrap().1.ca_cert,
            Some(PathBuf::from("/etc/opdi/ca.pem"))
        );
    }

    #[test]
    fn save_then_load_preserves_devices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.devices.insert("default".into(), entry("http://192.168.4.1"));

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.devices, cfg.devices);
    }

    #[test]
    fn rendered_toml_quotes_awkward_names_and_paths() {
        let mut cfg = Config::default();
        cfg.devices.insert("my lab".into(), DeviceEntry {
            ca_cert: Some(PathBuf::from(r#"/certs/"lab".pem"#)),
            ..entry("https://10.0.0.20")
        });
        cfg.devices.insert("bench".into(), entry("http://192.168.4.1"));

        let text = cfg.to_toml().unwrap();
        assert!(text.contains(r#"[devices."my lab"]"#), "{text}");
        assert!(text.find("[devices.bench]") < text.find(r#"[devices."my lab"]"#));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.devices, cfg.devices);
    }

    #[test]
    fn unknown_device_is_an_error() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.device(None), Err(ConfigError::NoDevice)));

        cfg.devices.insert("porch".into(), entry("http://192.168.4.1"));
        assert!(matches!(
            cfg.device(Some("garage")),
            Err(ConfigError::UnknownDevice { name }) if name == "garage"
        ));
    }

    #[test]
    fn sync_config_from_entry_and_defaults() {
        let defaults = Defaults::default();
        let mut device = entry("http://192.168.4.1");
        device.poll_interval_ms = Some(250);
        device.timeout = Some(3);

        let config = device_to_sync_config(&device, &defaults).unwrap();
        assert_eq!(config.url.as_str(), "http://192.168.4.1/");
        assert_eq!(config.stream_path, "/ws");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.reconnect, ReconnectPolicy::default());
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert!(config.stream_enabled);
    }

    #[test]
    fn tls_selection() {
        let defaults = Defaults::default();
        let mut device = entry("https://10.0.0.20");
        device.strict_tls = Some(true);
        assert_eq!(
            device_to_sync_config(&device, &defaults).unwrap().tls,
            TlsVerification::SystemDefaults
        );

        device.ca_cert = Some(PathBuf::from("/etc/opdi/ca.pem"));
        assert_eq!(
            device_to_sync_config(&device, &defaults).unwrap().tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/opdi/ca.pem"))
        );
    }

    #[test]
    fn rejects_bad_values() {
        let defaults = Defaults::default();
        assert!(matches!(
            device_to_sync_config(&entry("not a url"), &defaults),
            Err(ConfigError::Validation { field, .. }) if field == "url"
        ));
        assert!(matches!(
            device_to_sync_config(&entry("ftp://192.168.4.1"), &defaults),
            Err(ConfigError::Validation { field, .. }) if field == "url"
        ));

        let mut device = entry("http://192.168.4.1");
        device.poll_interval_ms = Some(0);
        assert!(device_to_sync_config(&device, &defaults).is_err());

        let inverted = Defaults {
            reconnect_base_ms: 20_000,
            ..Defaults::default()
        };
        assert!(device_to_sync_config(&entry("http://192.168.4.1"), &inverted).is_err());
    }
}
