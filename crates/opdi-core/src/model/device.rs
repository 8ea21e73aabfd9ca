// ── Device state ──

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Network role of the device. Exactly one at any time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceMode {
    #[default]
    Idle,
    StaConnecting,
    StaConnected,
    StaDisconnected,
    ApActive,
}

impl DeviceMode {
    /// Whether `ip`/`gateway`/`rssi` are meaningful in this mode.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::StaConnected)
    }

    /// Parse a mode from the firmware's vocabulary.
    ///
    /// Accepts the firmware state strings (`STA_CONNECTED`, `STA_CONNECT`,
    /// `AP_ACTIVE`, `INIT`), the short `ap` mode marker, and the canonical
    /// names in any casing (`ApActive`, `sta_connected`).
    pub fn from_wire(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "idle" | "init" => Some(Self::Idle),
            "staconnect" | "staconnecting" => Some(Self::StaConnecting),
            "staconnected" => Some(Self::StaConnected),
            "stadisconnected" => Some(Self::StaDisconnected),
            "apactive" | "ap" => Some(Self::ApActive),
            _ => None,
        }
    }
}

/// Soft-AP identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApConfig {
    pub ssid: String,
    pub channel: u8,
}

/// Camera sensor settings as last read from the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub auto_exposure: bool,
}

/// The reconciled network state of the device.
///
/// Owned by the [`Reconciler`](crate::Reconciler); consumers only ever see
/// copies inside a [`DeviceSnapshot`](super::DeviceSnapshot).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub mode: DeviceMode,
    pub ip: Option<String>,
    pub gateway: Option<String>,
    pub rssi: Option<i32>,
    pub ap_config: Option<ApConfig>,
    #[serde(skip)]
    pub last_updated: Instant,
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            mode: DeviceMode::Idle,
            ip: None,
            gateway: None,
            rssi: None,
            ap_config: None,
            last_updated: Instant::now(),
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}
