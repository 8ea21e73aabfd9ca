use thiserror::Error;

/// Top-level error type for the `opdi-api` crate.
///
/// Covers every failure mode of the device surface: HTTP polling,
/// command requests, and the WebSocket event stream. No retries happen at
/// this layer; `opdi-core` decides what to do with each kind.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Device answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Connection refused, DNS failure, reset mid-body, etc.
    #[error("Network failure: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake, certificate, or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Event stream ────────────────────────────────────────────────
    /// WebSocket handshake failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket dropped with an error after it was open.
    #[error("Event stream closed (code {code}): {reason}")]
    StreamClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a `reqwest` failure into a transport error kind.
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}
