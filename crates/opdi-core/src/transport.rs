// ── Transport seam ──
//
// Everything the synchronizer needs from the device, as a trait so the
// loop can be driven by the real HTTP/WebSocket client or by a scripted
// fake in tests.

use std::future::Future;

use opdi_api::models::{ApConfigUpdate, CameraConfigUpdate, ConnectRequest, ProfileCreate};
use opdi_api::transport::{TlsMode, TransportConfig};
use opdi_api::{DeviceClient, FrameStream};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::command::Command;
use crate::config::{SyncConfig, TlsVerification};
use crate::error::CoreError;
use crate::poll::PollKind;

/// Request/response polling, the event stream, and command delivery.
///
/// Implementations perform exactly one attempt per call.
pub trait DeviceTransport: Send + Sync + 'static {
    /// Fetch the raw JSON document for one poll kind.
    fn fetch_snapshot(
        &self,
        kind: PollKind,
    ) -> impl Future<Output = Result<Value, opdi_api::Error>> + Send;

    /// Open the event stream. The returned stream ends on close.
    fn open_stream(&self) -> impl Future<Output = Result<FrameStream, opdi_api::Error>> + Send;

    /// Deliver one (already validated) mutating command.
    fn send_command(
        &self,
        command: &Command,
    ) -> impl Future<Output = Result<Value, opdi_api::Error>> + Send;
}

impl DeviceTransport for DeviceClient {
    async fn fetch_snapshot(&self, kind: PollKind) -> Result<Value, opdi_api::Error> {
        self.get_json(kind.path()).await
    }

    async fn open_stream(&self) -> Result<FrameStream, opdi_api::Error> {
        DeviceClient::open_stream(self).await
    }

    async fn send_command(&self, command: &Command) -> Result<Value, opdi_api::Error> {
        match command {
            Command::Connect { ssid } => {
                self.connect(&ConnectRequest { ssid: ssid.clone() }).await
            }
            Command::AddProfile { ssid, psk, hidden } => {
                self.add_profile(&ProfileCreate {
                    ssid: ssid.clone(),
                    psk: psk.as_ref().map(|p| p.expose_secret().to_owned()),
                    hidden: *hidden,
                })
                .await
            }
            Command::DeleteProfile { id } => self.delete_profile(id).await,
            Command::SetApConfig { ssid, channel } => {
                self.set_ap_config(&ApConfigUpdate {
                    ssid: ssid.clone(),
                    channel: *channel,
                })
                .await
            }
            Command::SetCameraConfig(settings) => {
                self.set_camera_config(&CameraConfigUpdate {
                    resolution: settings.resolution.clone(),
                    quality: settings.quality,
                    brightness: settings.brightness,
                    contrast: settings.contrast,
                    saturation: settings.saturation,
                    auto_exposure: settings.auto_exposure,
                })
                .await
            }
        }
    }
}

/// Build the HTTP/WebSocket client described by `config`.
pub fn build_client(config: &SyncConfig) -> Result<DeviceClient, CoreError> {
    let transport = TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    };
    Ok(DeviceClient::new(config.url.clone(), &transport)?.with_stream_path(&config.stream_path))
}
