//! State synchronization between `opdi-api` and consumers (CLI, dashboards).
//!
//! The device reports its state over two independent channels: a
//! request/response HTTP API polled on demand, and a push event stream.
//! This crate merges both into one authoritative, consistent view:
//!
//! - **[`Synchronizer`]**: Lifecycle facade. [`start()`](Synchronizer::start)
//!   issues the startup polls, spawns the periodic status poll and the event
//!   stream; [`stop()`](Synchronizer::stop) cancels and joins everything.
//!   [`fetch_once()`] provides a task-free mode for single CLI invocations.
//!
//! - **[`Reconciler`]**: The single owner of [`DeviceState`]. Applies
//!   normalized events and poll responses and publishes an immutable
//!   [`DeviceSnapshot`] to a [`PresentationSink`] after every call.
//!
//! - **[`ReconnectController`]**: Event stream state machine with
//!   capped exponential backoff.
//!
//! - **[`normalize()`]**: Raw stream frames to typed [`DomainEvent`]s.
//!   Never fails; anything unrecognized becomes `Unknown`.
//!
//! - **[`Command`]**: Typed mutations, validated before they are sent and
//!   followed by the refresh that picks up their effect.

pub mod command;
pub mod config;
mod convert;
pub mod error;
pub mod log;
pub mod model;
pub mod normalize;
pub mod poll;
pub mod reconcile;
pub mod reconnect;
pub mod stream;
pub mod sync;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{CameraSettings, Command, CommandResult};
pub use config::{SyncConfig, TlsVerification};
pub use error::CoreError;
pub use log::EventLog;
pub use normalize::normalize;
pub use poll::{PollKind, PollScheduler};
pub use reconcile::{PresentationSink, Reconciler};
pub use reconnect::{ReconnectController, ReconnectPolicy};
pub use stream::SnapshotStream;
pub use sync::{Synchronizer, fetch_once};
pub use transport::{DeviceTransport, build_client};

pub use model::{
    ApConfig, AuthMode, CameraConfig, ConnectionHealth, DeviceLogLine, DeviceMode,
    DeviceSnapshot, DeviceState, DomainEvent, LogEntry, LogKind, Metrics, Profile, ScanResult,
    StreamPhase,
};
