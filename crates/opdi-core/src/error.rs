// ── Core error types ──
//
// User-facing errors from opdi-core. Consumers never match on reqwest or
// tungstenite failures directly; the `From<opdi_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Device request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Event stream unavailable: {reason}")]
    StreamUnavailable { reason: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Not found on device: {message}")]
    NotFound { message: String },

    #[error("Device rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Could not decode {what}: {message}")]
    Decode { what: String, message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Synchronizer is not running")]
    NotRunning,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<opdi_api::Error> for CoreError {
    fn from(err: opdi_api::Error) -> Self {
        match err {
            opdi_api::Error::HttpStatus {
                status: 404,
                message,
            } => CoreError::NotFound { message },
            opdi_api::Error::HttpStatus { status, message } => {
                CoreError::Rejected { status, message }
            }
            opdi_api::Error::Network(reason) => CoreError::ConnectionFailed { reason },
            opdi_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            opdi_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            opdi_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            opdi_api::Error::WebSocketConnect(reason) => CoreError::StreamUnavailable { reason },
            opdi_api::Error::StreamClosed { code, reason } => CoreError::StreamUnavailable {
                reason: format!("closed with code {code}: {reason}"),
            },
            opdi_api::Error::Deserialization { message, body: _ } => CoreError::Decode {
                what: "device response".into(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = CoreError::from(opdi_api::Error::HttpStatus {
            status: 404,
            message: "not found".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn other_statuses_are_rejections() {
        let err = CoreError::from(opdi_api::Error::HttpStatus {
            status: 400,
            message: "ssid required".into(),
        });
        assert_eq!(
            err.to_string(),
            "Device rejected the request (HTTP 400): ssid required"
        );
    }
}
