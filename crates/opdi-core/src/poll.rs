// ── Poll scheduling ──
//
// Bookkeeping for request/response refreshes: which kinds exist, where
// they live, and which are currently in flight. The synchronizer's loop
// owns one `PollScheduler` and drives its ticker.

use std::collections::HashSet;
use std::time::Duration;

use opdi_api::endpoints;
use serde::Serialize;
use tokio::time::{Interval, MissedTickBehavior};

/// Default cadence of the periodic status poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// A one-shot refresh the synchronizer knows how to request and apply.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PollKind {
    Status,
    Profiles,
    Scan,
    ScanSummary,
    Metrics,
    Version,
    SystemInfo,
    ApConfig,
    CameraConfig,
    Logs,
}

impl PollKind {
    /// Polls issued once when the synchronizer starts.
    pub const STARTUP: [Self; 6] = [
        Self::Status,
        Self::Profiles,
        Self::ApConfig,
        Self::Metrics,
        Self::Version,
        Self::SystemInfo,
    ];

    /// Device path for this poll.
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => endpoints::STA_STATUS,
            Self::Profiles => endpoints::STA_PROFILES,
            Self::Scan => endpoints::SCAN,
            Self::ScanSummary => endpoints::SCAN_SUMMARY,
            Self::Metrics => endpoints::METRICS,
            Self::Version => endpoints::VERSION,
            Self::SystemInfo => endpoints::SYSTEM_INFO,
            Self::ApConfig => endpoints::AP_CONFIG,
            Self::CameraConfig => endpoints::CAM_CONFIG,
            Self::Logs => endpoints::LOGS,
        }
    }
}

/// Tracks in-flight polls and owns the periodic cadence.
///
/// A request for a kind that is already in flight is suppressed; once
/// [`finish`](Self::finish) is called the kind may be requested again.
#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    in_flight: HashSet<PollKind>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            in_flight: HashSet::new(),
        }
    }

    /// Claim `kind` for a new request. Returns `false` if one is already
    /// outstanding, in which case the caller must not issue another.
    pub fn try_begin(&mut self, kind: PollKind) -> bool {
        self.in_flight.insert(kind)
    }

    /// Release `kind` after its response (or failure) has been handled.
    pub fn finish(&mut self, kind: PollKind) {
        self.in_flight.remove(&kind);
    }

    /// Periodic status ticker. The immediate first tick is consumed so the
    /// first periodic poll happens one full interval after start.
    pub async fn ticker(&self) -> Interval {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        ticker
    }
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
