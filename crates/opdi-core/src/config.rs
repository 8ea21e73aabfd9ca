// ── Runtime synchronizer configuration ──
//
// These types describe *how* to talk to a device and how aggressively to
// refresh. They never touch disk: the CLI (via `opdi-config`) builds a
// `SyncConfig` and hands it in.

use std::time::Duration;

use opdi_api::endpoints;
use url::Url;

use crate::poll::DEFAULT_POLL_INTERVAL;
use crate::reconnect::ReconnectPolicy;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for local devices.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for synchronizing with a single device.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Device root URL (e.g., `http://192.168.4.1`).
    pub url: Url,
    /// Event stream path, joined onto `url` with a ws/wss scheme.
    pub stream_path: String,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Cadence of the periodic status poll.
    pub poll_interval: Duration,
    pub reconnect: ReconnectPolicy,
    /// Run the event stream alongside polling.
    pub stream_enabled: bool,
}

impl SyncConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            stream_path: endpoints::EVENT_STREAM.to_owned(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            poll_interval: DEFAULT_POLL_INTERVAL,
            reconnect: ReconnectPolicy::default(),
            stream_enabled: true,
        }
    }
}
