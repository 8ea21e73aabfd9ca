// ── Command API ──
//
// All mutating requests flow through a unified `Command` enum. Each variant
// maps to exactly one device endpoint and names the poll that refreshes the
// state it changes.

use secrecy::SecretString;
use serde_json::Value;

use crate::error::CoreError;
use crate::poll::PollKind;

/// Longest SSID the 802.11 standard allows, in bytes.
pub const MAX_SSID_LEN: usize = 32;

/// Valid AP channels (2.4 GHz, ETSI).
pub const AP_CHANNELS: std::ops::RangeInclusive<u8> = 1..=13;

/// Highest JPEG quality index the camera accepts (lower is better).
pub const MAX_CAMERA_QUALITY: u8 = 63;

/// All mutating operations against a device.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Station ──────────────────────────────────────────────────────
    /// Join `ssid`, or the best known profile when absent.
    Connect { ssid: Option<String> },
    AddProfile {
        ssid: String,
        psk: Option<SecretString>,
        hidden: bool,
    },
    DeleteProfile { id: String },

    // ── Access point ─────────────────────────────────────────────────
    SetApConfig {
        ssid: Option<String>,
        channel: Option<u8>,
    },

    // ── Camera ───────────────────────────────────────────────────────
    SetCameraConfig(CameraSettings),
}

/// Partial camera update; `None` fields are left unchanged on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraSettings {
    pub resolution: Option<String>,
    pub quality: Option<u8>,
    pub brightness: Option<i32>,
    pub contrast: Option<i32>,
    pub saturation: Option<i32>,
    pub auto_exposure: Option<bool>,
}

impl CameraSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of a delivered command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The device's response body (`{"ok": true, ...}` on firmware that
    /// answers at all).
    pub response: Value,
    /// The refresh requested on the back of this command.
    pub refresh: PollKind,
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::AddProfile { .. } => "add_profile",
            Self::DeleteProfile { .. } => "delete_profile",
            Self::SetApConfig { .. } => "set_ap_config",
            Self::SetCameraConfig(_) => "set_camera_config",
        }
    }

    /// Poll that picks up the state this command changes.
    pub fn refresh_kind(&self) -> PollKind {
        match self {
            Self::Connect { .. } => PollKind::Status,
            Self::AddProfile { .. } | Self::DeleteProfile { .. } => PollKind::Profiles,
            Self::SetApConfig { .. } => PollKind::ApConfig,
            Self::SetCameraConfig(_) => PollKind::CameraConfig,
        }
    }

    /// Reject commands the device would refuse, before anything is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Connect { ssid } => ssid.as_deref().map_or(Ok(()), validate_ssid),
            Self::AddProfile { ssid, .. } => validate_ssid(ssid),
            Self::DeleteProfile { id } => {
                if id.trim().trim_end_matches('.').is_empty() {
                    return Err(CoreError::validation("profile id must not be empty"));
                }
                Ok(())
            }
            Self::SetApConfig { ssid, channel } => {
                if ssid.is_none() && channel.is_none() {
                    return Err(CoreError::validation(
                        "AP update must set an SSID or a channel",
                    ));
                }
                if let Some(ssid) = ssid {
                    validate_ssid(ssid)?;
                }
                if let Some(channel) = channel {
                    if !AP_CHANNELS.contains(channel) {
                        return Err(CoreError::validation(format!(
                            "AP channel {channel} is outside {}..={}",
                            AP_CHANNELS.start(),
                            AP_CHANNELS.end()
                        )));
                    }
                }
                Ok(())
            }
            Self::SetCameraConfig(settings) => {
                if settings.is_empty() {
                    return Err(CoreError::validation(
                        "camera update must change at least one setting",
                    ));
                }
                if let Some(quality) = settings.quality {
                    if quality > MAX_CAMERA_QUALITY {
                        return Err(CoreError::validation(format!(
                            "camera quality {quality} is outside 0..={MAX_CAMERA_QUALITY}"
                        )));
                    }
                }
                if settings.resolution.as_deref().is_some_and(|r| r.trim().is_empty()) {
                    return Err(CoreError::validation("camera resolution must not be empty"));
                }
                Ok(())
            }
        }
    }
}

fn validate_ssid(ssid: &str) -> Result<(), CoreError> {
    if ssid.is_empty() {
        return Err(CoreError::validation("SSID must not be empty"));
    }
    if ssid.len() > MAX_SSID_LEN {
        return Err(CoreError::validation(format!(
            "SSID is {} bytes, the limit is {MAX_SSID_LEN}",
            ssid.len()
        )));
    }
    Ok(())
}
