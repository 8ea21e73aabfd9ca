// ── State reconciliation ──
//
// The single owner of `DeviceState`. Polled snapshots and normalized stream
// events are merged here, and every apply call publishes exactly one
// immutable `DeviceSnapshot` to the presentation sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use opdi_api::models::{
    ApConfigBody, CameraConfigBody, LogLineEntry, MetricsBody, ProfileEntry, ScanEntry,
    StatusResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::convert::StatusUpdate;
use crate::error::CoreError;
use crate::model::{
    ApConfig, CameraConfig, ConnectionHealth, DeviceLogLine, DeviceMode, DeviceSnapshot, DeviceState,
    DomainEvent, Metrics, Profile, ScanResult,
};
use crate::poll::PollKind;

// ── PresentationSink ─────────────────────────────────────────────────

/// Receives every snapshot the reconciler emits, in order.
pub trait PresentationSink: Send + Sync {
    fn present(&self, snapshot: Arc<DeviceSnapshot>);
}

impl PresentationSink for watch::Sender<Arc<DeviceSnapshot>> {
    fn present(&self, snapshot: Arc<DeviceSnapshot>) {
        self.send_replace(snapshot);
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for Arc<S> {
    fn present(&self, snapshot: Arc<DeviceSnapshot>) {
        (**self).present(snapshot);
    }
}

// ── Reconciler ───────────────────────────────────────────────────────

/// Authoritative in-memory state machine for one device.
///
/// Calls are synchronous and run to completion; the caller serializes
/// them (the synchronizer's loop is the only caller at runtime).
pub struct Reconciler<S> {
    state: DeviceState,
    metrics: Metrics,
    profiles: Arc<Vec<Profile>>,
    scan: Arc<Vec<ScanResult>>,
    camera: Option<CameraConfig>,
    device_logs: Arc<Vec<DeviceLogLine>>,
    version: Option<Value>,
    system_info: Option<Value>,
    stream: ConnectionHealth,
    poll_errors: BTreeMap<PollKind, String>,
    sequence: u64,
    sink: S,
}

impl<S: PresentationSink> Reconciler<S> {
    /// Fresh state (`mode = Idle`). Nothing is emitted until the first call.
    pub fn new(sink: S) -> Self {
        Self {
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
            sequence: 0,
            sink,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Apply a normalized stream event.
    ///
    /// Returns the poll the caller should issue out of cadence, if any:
    /// `status` after `StaConnected` and `ApActive` so that gateway and AP
    /// details the event does not carry get filled in.
    pub fn apply_event(&mut self, event: &DomainEvent) -> Option<PollKind> {
        let follow_up = match event {
            DomainEvent::StaConnected { ip, gateway, rssi } => {
                self.set_mode(DeviceMode::StaConnected);
                self.state.ip.clone_from(ip);
                self.state.rssi = *rssi;
                self.state.gateway.clone_from(gateway);
                Some(PollKind::Status)
            }
            DomainEvent::StaDisconnected {
                reason,
                reason_text,
            } => {
                debug!(?reason, ?reason_text, "station disconnected");
                self.set_mode(DeviceMode::StaDisconnected);
                None
            }
            DomainEvent::ApActive { ssid, channel } => {
                self.set_mode(DeviceMode::ApActive);
                if let (Some(ssid), Some(channel)) = (ssid, channel) {
                    self.state.ap_config = Some(ApConfig {
                        ssid: ssid.clone(),
                        channel: *channel,
                    });
                }
                Some(PollKind::Status)
            }
            DomainEvent::MetricsUpdate(metrics) => {
                self.metrics = *metrics;
                None
            }
            DomainEvent::Unknown => {
                trace!("ignoring unknown event");
                None
            }
        };

        if !matches!(event, DomainEvent::Unknown) {
            self.state.last_updated = Instant::now();
        }
        self.emit();
        follow_up
    }

    /// Apply a successful poll response.
    ///
    /// A payload that does not decode for `kind` leaves all data untouched,
    /// records a poll error, and is returned as [`CoreError::Decode`].
    /// A snapshot is emitted either way.
    pub fn apply_poll(&mut self, kind: PollKind, payload: Value) -> Result<(), CoreError> {
        let result = self.merge_poll(kind, payload);
        match &result {
            Ok(()) => {
                self.poll_errors.remove(&kind);
            }
            Err(e) => {
                self.poll_errors.insert(kind, e.to_string());
            }
        }
        self.emit();
        result
    }

    /// Record a transport-level poll failure. Data is kept as-is.
    pub fn record_poll_failure(&mut self, kind: PollKind, message: impl Into<String>) {
        self.poll_errors.insert(kind, message.into());
        self.emit();
    }

    /// Mirror the reconnection controller's view of the stream.
    pub fn set_stream_health(&mut self, health: ConnectionHealth) {
        if self.stream != health {
            self.stream = health;
            self.emit();
        }
    }

    /// Build a snapshot of the current state without emitting it.
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            sequence: self.sequence,
            state: self.state.clone(),
            metrics: self.metrics,
            profiles: Arc::clone(&self.profiles),
            scan: Arc::clone(&self.scan),
            camera: self.camera,
            device_logs: Arc::clone(&self.device_logs),
            version: self.version.clone(),
            system_info: self.system_info.clone(),
            stream: self.stream,
            poll_errors: self.poll_errors.clone(),
        }
    }

    // ── Merge rules ──────────────────────────────────────────────────

    fn merge_poll(&mut self, kind: PollKind, payload: Value) -> Result<(), CoreError> {
        match kind {
            PollKind::Status => {
                let status: StatusResponse = decode(kind, payload)?;
                let update = StatusUpdate::try_from(status).map_err(|message| {
                    CoreError::Decode {
                        what: kind.to_string(),
                        message,
                    }
                })?;
                self.apply_status(update);
            }
            PollKind::Profiles => {
                let entries: Vec<ProfileEntry> = decode(kind, payload)?;
                self.profiles = Arc::new(entries.into_iter().map(Profile::from).collect());
            }
            PollKind::Scan | PollKind::ScanSummary => {
                let entries: Vec<ScanEntry> = decode(kind, payload)?;
                self.scan = Arc::new(entries.into_iter().map(ScanResult::from).collect());
            }
            PollKind::Metrics => {
                let body: MetricsBody = decode(kind, payload)?;
                self.metrics = body.into();
            }
            PollKind::ApConfig => {
                let body: ApConfigBody = decode(kind, payload)?;
                self.state.ap_config = Some(body.into());
                self.state.last_updated = Instant::now();
            }
            PollKind::CameraConfig => {
                let body: CameraConfigBody = decode(kind, payload)?;
                self.camera = Some(body.into());
            }
            PollKind::Logs => {
                let lines: Vec<LogLineEntry> = decode(kind, payload)?;
                self.device_logs =
                    Arc::new(lines.into_iter().map(DeviceLogLine::from).collect());
            }
            PollKind::Version => self.version = Some(payload),
            PollKind::SystemInfo => self.system_info = Some(payload),
        }
        Ok(())
    }

    /// A status poll is authoritative for the mode and addressing. The AP
    /// config is only replaced when the payload carries one: it is a stored
    /// setting, and the firmware omits it outside AP mode.
    fn apply_status(&mut self, update: StatusUpdate) {
        self.set_mode(update.mode);
        if update.mode.is_connected() {
            self.state.ip = update.ip;
            self.state.gateway = update.gateway;
            self.state.rssi = update.rssi;
        }
        if let Some(ap) = update.ap_config {
            self.state.ap_config = Some(ap);
        }
        if let Some(metrics) = update.metrics {
            self.metrics = metrics;
        }
        self.state.last_updated = Instant::now();
    }

    /// Change mode, clearing addressing whenever the new mode is not a
    /// connected one.
    fn set_mode(&mut self, mode: DeviceMode) {
        if self.state.mode != mode {
            debug!(from = %self.state.mode, to = %mode, "device mode changed");
        }
        self.state.mode = mode;
        if !mode.is_connected() {
            self.state.ip = None;
            self.state.gateway = None;
            self.state.rssi = None;
        }
    }

    fn emit(&mut self) {
        self.sequence += 1;
        self.sink.present(Arc::new(self.snapshot()));
    }
}

fn decode<T: DeserializeOwned>(kind: PollKind, payload: Value) -> Result<T, CoreError> {
    serde_json::from_value(payload).map_err(|e| CoreError::Decode {
        what: kind.to_string(),
        message: e.to_string(),
    })
}
