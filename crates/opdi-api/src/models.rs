// Device firmware wire types
//
// Shapes as the firmware renders them. Fields use `#[serde(default)]`
// liberally and accept a few aliases because the firmware and the bundled
// web clients disagree on naming across builds.

use serde::{Deserialize, Serialize};

// ── Status ───────────────────────────────────────────────────────────

/// Body of `GET /api/v1/net/sta/status`.
///
/// ```json
/// { "state": "AP_ACTIVE", "mode": "ap", "ap": { "ssid": "opdi", "channel": 6 },
///   "metrics": { "attempts": 3, "success": 1, "avg_ms": 2100, "scans": 4, "retries": 0 } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    /// `STA_CONNECTED`, `AP_ACTIVE`, `STA_CONNECT`, `INIT`.
    #[serde(default)]
    pub state: Option<String>,
    /// Only present (`"ap"`) when the soft-AP is up on some builds.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default, alias = "gateway")]
    pub gw: Option<String>,
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default, alias = "apConfig", alias = "ap_config")]
    pub ap: Option<ApConfigBody>,
    #[serde(default)]
    pub metrics: Option<MetricsBody>,
}

/// Soft-AP settings, as read from `GET /api/v1/net/ap/config` or embedded in status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApConfigBody {
    pub ssid: String,
    #[serde(alias = "ch")]
    pub channel: u8,
}

/// Connection counters. Passed through opaquely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsBody {
    #[serde(default)]
    pub attempts: u64,
    #[serde(default, alias = "successes")]
    pub success: u64,
    #[serde(default, alias = "avgLatencyMs")]
    pub avg_ms: u64,
    #[serde(default, alias = "scanCount")]
    pub scans: u64,
    #[serde(default, alias = "retryCount")]
    pub retries: u64,
}

// ── Profiles ─────────────────────────────────────────────────────────

/// One entry of `GET /api/v1/net/sta/profiles`.
///
/// The firmware never returns the SSID itself, only its length and a
/// digest tail that doubles as the delete handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub id: String,
    #[serde(default, alias = "ssidLength")]
    pub ssid_len: u32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, alias = "successCount")]
    pub success: u32,
}

// ── Scan ─────────────────────────────────────────────────────────────

/// One access point from `scan` or `scan_summary` (the latter omits `bssid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub bssid: Option<String>,
    pub rssi: i32,
    /// Numeric `wifi_auth_mode_t`.
    #[serde(default)]
    pub auth: u8,
    #[serde(alias = "channel")]
    pub ch: u8,
}

// ── Logs ─────────────────────────────────────────────────────────────

/// One line of the firmware's in-memory network log ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLineEntry {
    /// Milliseconds since boot.
    pub t: u64,
    pub m: String,
}

// ── Camera ───────────────────────────────────────────────────────────

/// Body of `GET /api/v1/cam/config`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConfigBody {
    #[serde(default)]
    pub brightness: i32,
    #[serde(default)]
    pub contrast: i32,
    #[serde(default)]
    pub saturation: i32,
    #[serde(default)]
    pub auto_exposure: bool,
}

// ── Request bodies ───────────────────────────────────────────────────

/// `POST /api/v1/net/sta/profiles`
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCreate {
    pub ssid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psk: Option<String>,
    pub hidden: bool,
}

/// `POST /api/v1/net/sta/connect`. Without an SSID the firmware picks the
/// best known profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
}

/// `POST /api/v1/net/ap/config`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
}

/// `POST /api/v1/cam/config`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CameraConfigUpdate {
    #[serde(rename = "res", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_exposure: Option<bool>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_accepts_firmware_ap_shape() {
        let status: StatusResponse = serde_json::from_value(json!({
            "state": "AP_ACTIVE",
            "mode": "ap",
            "ap": { "ssid": "opdi-setup", "channel": 6 },
            "metrics": { "attempts": 2, "success": 0, "avg_ms": 0, "scans": 1, "retries": 2 }
        }))
        .unwrap();

        assert_eq!(status.state.as_deref(), Some("AP_ACTIVE"));
        assert_eq!(
            status.ap,
            Some(ApConfigBody {
                ssid: "opdi-setup".into(),
                channel: 6
            })
        );
        assert_eq!(status.metrics.map(|m| m.retries), Some(2));
    }

    #[test]
    fn status_accepts_camel_case_ap_config() {
        let status: StatusResponse = serde_json::from_value(json!({
            "mode": "ApActive",
            "apConfig": { "ssid": "Guest", "channel": 11 }
        }))
        .unwrap();
        assert_eq!(status.ap.map(|a| a.channel), Some(11));
    }

    #[test]
    fn scan_summary_without_bssid() {
        let entry: ScanEntry =
            serde_json::from_value(json!({ "ssid": "", "rssi": -71, "auth": 3, "ch": 1 })).unwrap();
        assert_eq!(entry.bssid, None);
        assert_eq!(entry.ch, 1);
    }

    #[test]
    fn camera_update_skips_unset_fields() {
        let body = CameraConfigUpdate {
            resolution: Some("VGA".into()),
            brightness: Some(1),
            ..CameraConfigUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "res": "VGA", "brightness": 1 })
        );
    }
}
