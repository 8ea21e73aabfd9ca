// ── Station profiles, scan results, connection metrics ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A saved station credential set.
///
/// The firmware never discloses the SSID of a saved profile, only its
/// length; `id` is an opaque digest tail used as the delete handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub ssid_length: u32,
    pub hidden: bool,
    pub success_count: u32,
}

/// Wi-Fi authentication mode as reported by the radio (`wifi_auth_mode_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Wpa2Enterprise,
    Wpa3Psk,
    Wpa2Wpa3Psk,
    WapiPsk,
    Owe,
    Other(u8),
}

impl From<u8> for AuthMode {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Open,
            1 => Self::Wep,
            2 => Self::WpaPsk,
            3 => Self::Wpa2Psk,
            4 => Self::WpaWpa2Psk,
            5 => Self::Wpa2Enterprise,
            6 => Self::Wpa3Psk,
            7 => Self::Wpa2Wpa3Psk,
            8 => Self::WapiPsk,
            9 => Self::Owe,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Wep => "WEP",
            Self::WpaPsk => "WPA-PSK",
            Self::Wpa2Psk => "WPA2-PSK",
            Self::WpaWpa2Psk => "WPA/WPA2-PSK",
            Self::Wpa2Enterprise => "WPA2-Enterprise",
            Self::Wpa3Psk => "WPA3-PSK",
            Self::Wpa2Wpa3Psk => "WPA2/WPA3-PSK",
            Self::WapiPsk => "WAPI-PSK",
            Self::Owe => "OWE",
            Self::Other(raw) => return write!(f, "auth({raw})"),
        };
        f.write_str(label)
    }
}

/// One visible access point. `ssid == None` means a hidden network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ssid: Option<String>,
    pub bssid: Option<String>,
    pub rssi: i32,
    pub auth: AuthMode,
    pub channel: u8,
}

/// Station connection counters, passed through from the firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub attempts: u64,
    pub successes: u64,
    pub avg_latency_ms: u64,
    pub scan_count: u64,
    pub retry_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_mode_labels() {
        assert_eq!(AuthMode::from(3).to_string(), "WPA2-PSK");
        assert_eq!(AuthMode::from(0).to_string(), "open");
        assert_eq!(AuthMode::from(42), AuthMode::Other(42));
        assert_eq!(AuthMode::from(42).to_string(), "auth(42)");
    }
}
