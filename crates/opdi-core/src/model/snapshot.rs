// ── Immutable snapshots handed to presentation sinks ──

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::device::{CameraConfig, DeviceState};
use super::log::DeviceLogLine;
use super::network::{Metrics, Profile, ScanResult};
use crate::poll::PollKind;

/// Lifecycle phase of the event stream.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StreamPhase {
    #[default]
    Disconnected,
    Connecting,
    Open,
}

/// Event stream health, as last reported by the reconnection controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionHealth {
    pub phase: StreamPhase,
    /// Consecutive failed connections since the last successful open.
    pub attempt: u32,
    /// Delay before the pending retry, while one is scheduled.
    pub next_delay_ms: Option<u64>,
    pub is_open: bool,
}

/// Everything the synchronizer knows, frozen at one point in time.
///
/// `sequence` increases by one for every reconciler call that emitted it.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSnapshot {
    pub sequence: u64,
    pub state: DeviceState,
    pub metrics: Metrics,
    pub profiles: Arc<Vec<Profile>>,
    pub scan: Arc<Vec<ScanResult>>,
    pub camera: Option<CameraConfig>,
    pub device_logs: Arc<Vec<DeviceLogLine>>,
    pub version: Option<Value>,
    pub system_info: Option<Value>,
    pub stream: ConnectionHealth,
    /// Last failure per poll kind; cleared by the next success of that kind.
    pub poll_errors: BTreeMap<PollKind, String>,
}

impl DeviceSnapshot {
    /// The snapshot published before any data has arrived.
    pub fn initial() -> Self {
        Self {
            sequence: 0,
            state: DeviceState::new(),
            metrics: Metrics::default(),
            profiles: Arc::default(),
            scan: Arc::default(),
            camera: None,
            device_logs: Arc::default(),
            version: None,
            system_info: None,
            stream: ConnectionHealth::default(),
            poll_errors: BTreeMap::new(),
        }
    }
}
