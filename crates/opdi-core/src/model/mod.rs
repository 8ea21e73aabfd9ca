// ── Device domain model ──
//
// Canonical representation of everything the synchronizer knows about a
// device. Wire shapes live in `opdi_api::models`; `crate::convert` maps
// them into these types.

pub mod device;
pub mod event;
pub mod log;
pub mod network;
pub mod snapshot;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::{ApConfig, CameraConfig, DeviceMode, DeviceState};
pub use event::DomainEvent;
pub use log::{DeviceLogLine, LogEntry, LogKind};
pub use network::{AuthMode, Metrics, Profile, ScanResult};
pub use snapshot::{ConnectionHealth, DeviceSnapshot, StreamPhase};
