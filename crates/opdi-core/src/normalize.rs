// ── Event normalization ──
//
// Raw event-stream text in, typed `DomainEvent` out. Never fails: anything
// that does not decode as a recognized `{type, sub}` frame is `Unknown`.

use opdi_api::models::MetricsBody;
use serde::Deserialize;
use tracing::trace;

use crate::model::DomainEvent;

/// Outer envelope, dispatched on `type`. Only `net` frames are recognized.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Frame {
    Net(NetFrame),
}

/// `net` frames, dispatched on `sub`.
#[derive(Debug, Deserialize)]
#[serde(tag = "sub", rename_all = "snake_case")]
enum NetFrame {
    StaConnected {
        #[serde(default)]
        ip: Option<String>,
        #[serde(default)]
        gw: Option<String>,
        #[serde(default)]
        rssi: Option<i32>,
    },
    StaDisconnected {
        #[serde(default)]
        reason: Option<i32>,
        #[serde(default)]
        reason_text: Option<String>,
    },
    ApActive {
        #[serde(default)]
        ssid: Option<String>,
        #[serde(default)]
        channel: Option<u8>,
    },
    Metrics(MetricsBody),
}

/// Decode one raw frame.
///
/// Malformed JSON, unknown `type`/`sub` values, and the firmware's legacy
/// free-text diagnostic lines all come back as [`DomainEvent::Unknown`].
pub fn normalize(raw: &str) -> DomainEvent {
    let frame: Frame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            trace!(error = %e, "unrecognized event frame");
            return DomainEvent::Unknown;
        }
    };

    let Frame::Net(net) = frame;
    match net {
        NetFrame::StaConnected { ip, gw, rssi } => DomainEvent::StaConnected {
            ip: non_empty_addr(ip),
            gateway: non_empty_addr(gw),
            rssi,
        },
        NetFrame::StaDisconnected {
            reason,
            reason_text,
        } => DomainEvent::StaDisconnected {
            reason,
            reason_text: reason_text.filter(|t| !t.is_empty()),
        },
        NetFrame::ApActive { ssid, channel } => DomainEvent::ApActive {
            ssid: ssid.filter(|s| !s.is_empty()),
            channel,
        },
        NetFrame::Metrics(body) => DomainEvent::MetricsUpdate(body.into()),
    }
}

/// The firmware renders "no address" as `""` or `"0.0.0.0"`.
pub(crate) fn non_empty_addr(addr: Option<String>) -> Option<String> {
    addr.filter(|a| !a.is_empty() && a != "0.0.0.0")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Metrics;

    #[test]
    fn sta_connected_frame() {
        let event = normalize(
            r#"{"type":"net","sub":"sta_connected","ip":"10.0.0.5","gw":"10.0.0.1","rssi":-40}"#,
        );
        assert_eq!(
            event,
            DomainEvent::StaConnected {
                ip: Some("10.0.0.5".into()),
                gateway: Some("10.0.0.1".into()),
                rssi: Some(-40),
            }
        );
    }

    #[test]
    fn sta_disconnected_frame() {
        let event = normalize(
            r#"{"type":"net","sub":"sta_disconnected","reason":201,"reason_text":"NO_AP_FOUND"}"#,
        );
        assert_eq!(
            event,
            DomainEvent::StaDisconnected {
                reason: Some(201),
                reason_text: Some("NO_AP_FOUND".into()),
            }
        );
    }

    #[test]
    fn ap_active_frame_with_and_without_payload() {
        assert_eq!(
            normalize(r#"{"type":"net","sub":"ap_active","ssid":"Guest","channel":11}"#),
            DomainEvent::ApActive {
                ssid: Some("Guest".into()),
                channel: Some(11),
            }
        );
        assert_eq!(
            normalize(r#"{"type":"net","sub":"ap_active"}"#),
            DomainEvent::ApActive {
                ssid: None,
                channel: None,
            }
        );
    }

    #[test]
    fn metrics_frame_passes_counters_through() {
        let event = normalize(
            r#"{"type":"net","sub":"metrics","attempts":7,"success":5,"avg_ms":1830,"scans":3,"retries":1}"#,
        );
        assert_eq!(
            event,
            DomainEvent::MetricsUpdate(Metrics {
                attempts: 7,
                successes: 5,
                avg_latency_ms: 1830,
                scan_count: 3,
                retry_count: 1,
            })
        );
    }

    #[test]
    fn zero_address_is_treated_as_absent() {
        let event = normalize(r#"{"type":"net","sub":"sta_connected","ip":"0.0.0.0","gw":""}"#);
        assert_eq!(
            event,
            DomainEvent::StaConnected {
                ip: None,
                gateway: None,
                rssi: None,
            }
        );
    }

    #[test]
    fn malformed_and_unrecognized_frames_are_unknown() {
        for raw in [
            "{not-json",
            "",
            "wifi:state: run -> init (0)",
            "42",
            "[]",
            r#"{"type":"cam","sub":"frame"}"#,
            r#"{"type":"net","sub":"mesh_joined"}"#,
            r#"{"type":"net"}"#,
            r#"{"sub":"sta_connected"}"#,
            r#"{"type":"net","sub":"ap_active","channel":"eleven"}"#,
        ] {
            assert_eq!(normalize(raw), DomainEvent::Unknown, "frame: {raw:?}");
        }
    }
}
