// ── Normalized stream events ──

use serde::Serialize;

use super::network::Metrics;

/// A typed event from the device's event stream.
///
/// Only [`normalize`](crate::normalize::normalize) constructs these from
/// wire frames; anything it cannot recognize becomes [`Unknown`](Self::Unknown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    StaConnected {
        ip: Option<String>,
        gateway: Option<String>,
        rssi: Option<i32>,
    },
    StaDisconnected {
        reason: Option<i32>,
        reason_text: Option<String>,
    },
    ApActive {
        ssid: Option<String>,
        channel: Option<u8>,
    },
    MetricsUpdate(Metrics),
    Unknown,
}

impl DomainEvent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StaConnected { .. } => "sta_connected",
            Self::StaDisconnected { .. } => "sta_disconnected",
            Self::ApActive { .. } => "ap_active",
            Self::MetricsUpdate(_) => "metrics",
            Self::Unknown => "unknown",
        }
    }
}
