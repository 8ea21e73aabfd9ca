// Device firmware URL paths.
//
// Every path is absolute from the device root; `DeviceClient` joins them
// onto its base URL.

// ── Station ─────────────────────────────────────────────────────────

pub const STA_STATUS: &str = "/api/v1/net/sta/status";
pub const STA_PROFILES: &str = "/api/v1/net/sta/profiles";
pub const STA_CONNECT: &str = "/api/v1/net/sta/connect";

/// `DELETE` target for a single saved profile.
pub fn sta_profile(id: &str) -> String {
    format!("{STA_PROFILES}/{id}")
}

// ── Scanning ────────────────────────────────────────────────────────

pub const SCAN: &str = "/api/v1/net/scan";
pub const SCAN_SUMMARY: &str = "/api/v1/net/scan_summary";

// ── Access point ────────────────────────────────────────────────────

pub const AP_CONFIG: &str = "/api/v1/net/ap/config";

// ── Diagnostics ─────────────────────────────────────────────────────

pub const METRICS: &str = "/api/v1/net/metrics";
pub const VERSION: &str = "/api/v1/net/version";
pub const LOGS: &str = "/api/v1/net/logs";
pub const SYSTEM_INFO: &str = "/api/v1/system/info";

// ── Camera ──────────────────────────────────────────────────────────

pub const CAM_SNAPSHOT: &str = "/api/v1/cam/snapshot";
pub const CAM_CONFIG: &str = "/api/v1/cam/config";

// ── Event stream ────────────────────────────────────────────────────

pub const EVENT_STREAM: &str = "/ws";
