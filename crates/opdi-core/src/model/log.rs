// ── Event log entries ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What produced a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogKind {
    /// A raw frame from the event stream, recorded before normalization.
    Frame,
    StreamOpened,
    StreamClosed,
    StreamError,
    PollFailed,
    Command,
}

/// One line of the synchronizer's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn now(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            kind,
            message: message.into(),
        }
    }
}

/// One line of the device's own network log ring (`GET /api/v1/net/logs`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceLogLine {
    /// Milliseconds since device boot.
    pub uptime_ms: u64,
    pub message: String,
}
