// Device endpoints
//
// Typed helpers for the mutating firmware endpoints plus the camera
// snapshot. Read endpoints are fetched as raw JSON by the synchronizer and
// decoded there.

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::client::DeviceClient;
use crate::endpoints;
use crate::error::Error;
use crate::models::{ApConfigUpdate, CameraConfigUpdate, ConnectRequest, ProfileCreate};

impl DeviceClient {
    /// Save (or overwrite) a station profile.
    ///
    /// `POST /api/v1/net/sta/profiles`
    pub async fn add_profile(&self, profile: &ProfileCreate) -> Result<Value, Error> {
        debug!(ssid = %profile.ssid, hidden = profile.hidden, "saving station profile");
        self.post_json(endpoints::STA_PROFILES, profile).await
    }

    /// Forget a saved profile by its digest-tail id.
    ///
    /// `DELETE /api/v1/net/sta/profiles/{id}`
    ///
    /// The firmware renders ids with a trailing ellipsis (`a1b2c3d4...`);
    /// it is stripped before building the path.
    pub async fn delete_profile(&self, id: &str) -> Result<Value, Error> {
        let id = id.trim_end_matches('.');
        debug!(id, "forgetting station profile");
        self.delete(&endpoints::sta_profile(id)).await
    }

    /// Ask the device to join a network. `None` reconnects to the best
    /// known profile.
    ///
    /// `POST /api/v1/net/sta/connect`
    pub async fn connect(&self, request: &ConnectRequest) -> Result<Value, Error> {
        debug!(ssid = ?request.ssid, "requesting station connect");
        self.post_json(endpoints::STA_CONNECT, request).await
    }

    /// Update the soft-AP SSID and/or channel.
    ///
    /// `POST /api/v1/net/ap/config`
    pub async fn set_ap_config(&self, update: &ApConfigUpdate) -> Result<Value, Error> {
        debug!(ssid = ?update.ssid, channel = ?update.channel, "updating AP config");
        self.post_json(endpoints::AP_CONFIG, update).await
    }

    /// Update camera sensor settings.
    ///
    /// `POST /api/v1/cam/config`
    pub async fn set_camera_config(&self, update: &CameraConfigUpdate) -> Result<Value, Error> {
        debug!("updating camera config");
        self.post_json(endpoints::CAM_CONFIG, update).await
    }

    /// Grab a single JPEG frame.
    ///
    /// `GET /api/v1/cam/snapshot`
    pub async fn camera_snapshot(&self) -> Result<Bytes, Error> {
        debug!("fetching camera snapshot");
        self.get_bytes(endpoints::CAM_SNAPSHOT).await
    }
}
