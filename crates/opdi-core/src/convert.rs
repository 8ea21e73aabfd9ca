// ── API-to-domain type conversions ──
//
// Bridges raw `opdi_api::models` wire types into canonical
// `opdi_core::model` domain types. Each `From` impl renames fields and
// fills defaults for data the firmware leaves out.

use opdi_api::models::{
    ApConfigBody, CameraConfigBody, LogLineEntry, MetricsBody, ProfileEntry, ScanEntry,
    StatusResponse,
};

use crate::model::{ApConfig, CameraConfig, DeviceLogLine, DeviceMode, Metrics, Profile, ScanResult};
use crate::normalize::non_empty_addr;

// ── Simple records ─────────────────────────────────────────────────

impl From<MetricsBody> for Metrics {
    fn from(m: MetricsBody) -> Self {
        Self {
            attempts: m.attempts,
            successes: m.success,
            avg_latency_ms: m.avg_ms,
            scan_count: m.scans,
            retry_count: m.retries,
        }
    }
}

impl From<ApConfigBody> for ApConfig {
    fn from(ap: ApConfigBody) -> Self {
        Self {
            ssid: ap.ssid,
            channel: ap.channel,
        }
    }
}

impl From<ProfileEntry> for Profile {
    fn from(p: ProfileEntry) -> Self {
        Self {
            id: p.id,
            ssid_length: p.ssid_len,
            hidden: p.hidden,
            success_count: p.success,
        }
    }
}

impl From<ScanEntry> for ScanResult {
    fn from(s: ScanEntry) -> Self {
        Self {
            // Hidden networks come through as an empty SSID.
            ssid: s.ssid.filter(|ssid| !ssid.is_empty()),
            bssid: s.bssid.filter(|bssid| !bssid.is_empty()),
            rssi: s.rssi,
            auth: s.auth.into(),
            channel: s.ch,
        }
    }
}

impl From<LogLineEntry> for DeviceLogLine {
    fn from(l: LogLineEntry) -> Self {
        Self {
            uptime_ms: l.t,
            message: l.m,
        }
    }
}

impl From<CameraConfigBody> for CameraConfig {
    fn from(c: CameraConfigBody) -> Self {
        Self {
            brightness: c.brightness,
            contrast: c.contrast,
            saturation: c.saturation,
            auto_exposure: c.auto_exposure,
        }
    }
}

// ── Status ─────────────────────────────────────────────────────────

/// A decoded status poll, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusUpdate {
    pub mode: DeviceMode,
    pub ip: Option<String>,
    pub gateway: Option<String>,
    pub rssi: Option<i32>,
    pub ap_config: Option<ApConfig>,
    pub metrics: Option<Metrics>,
}

impl TryFrom<StatusResponse> for StatusUpdate {
    type Error = String;

    /// `state` wins over `mode` when both are present; the firmware sends
    /// `state: "AP_ACTIVE", mode: "ap"` together.
    fn try_from(s: StatusResponse) -> Result<Self, Self::Error> {
        let mode = s
            .state
            .as_deref()
            .and_then(DeviceMode::from_wire)
            .or_else(|| s.mode.as_deref().and_then(DeviceMode::from_wire))
            .ok_or_else(|| {
                format!(
                    "unrecognized device mode (state={:?}, mode={:?})",
                    s.state, s.mode
                )
            })?;

        Ok(Self {
            mode,
            ip: non_empty_addr(s.ip),
            gateway: non_empty_addr(s.gw),
            rssi: s.rssi,
            ap_config: s.ap.map(ApConfig::from),
            metrics: s.metrics.map(Metrics::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::AuthMode;

    #[test]
    fn status_state_takes_precedence_over_mode() {
        let status = StatusResponse {
            state: Some("AP_ACTIVE".into()),
            mode: Some("ap".into()),
            ap: Some(ApConfigBody {
                ssid: "opdi-setup".into(),
                channel: 6,
            }),
            ..StatusResponse::default()
        };
        let update = StatusUpdate::try_from(status).unwrap();
        assert_eq!(update.mode, DeviceMode::ApActive);
        assert_eq!(
            update.ap_config,
            Some(ApConfig {
                ssid: "opdi-setup".into(),
                channel: 6
            })
        );
    }

    #[test]
    fn status_without_mode_is_rejected() {
        let status = StatusResponse {
            ip: Some("10.0.0.5".into()),
            ..StatusResponse::default()
        };
        assert!(StatusUpdate::try_from(status).is_err());
    }

    #[test]
    fn hidden_scan_entry_has_no_ssid() {
        let result = ScanResult::from(ScanEntry {
            ssid: Some(String::new()),
            bssid: None,
            rssi: -80,
            auth: 3,
            ch: 6,
        });
        assert_eq!(result.ssid, None);
        assert_eq!(result.auth, AuthMode::Wpa2Psk);
    }
}
