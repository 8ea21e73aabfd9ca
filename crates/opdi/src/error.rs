//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use opdi_config::ConfigError;
use opdi_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the device: {reason}")]
    #[diagnostic(
        code(opdi::connection_failed),
        help(
            "Check that the device is powered and that you are on its network.\n\
             A device in AP mode answers at http://192.168.4.1"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Event stream unavailable: {reason}")]
    #[diagnostic(
        code(opdi::stream_unavailable),
        help("Run `opdi watch --no-stream` to rely on polling alone.")
    )]
    StreamUnavailable { reason: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(opdi::not_found),
        help("Run: opdi {list_command} to see what the device has")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Device rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(opdi::rejected))]
    Rejected { status: u16, message: String },

    #[error("Unexpected response for {what}: {message}")]
    #[diagnostic(
        code(opdi::decode),
        help("The firmware may be newer or older than this CLI. Try -vv for details.")
    )]
    Decode { what: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(opdi::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Device '{name}' not found in configuration")]
    #[diagnostic(
        code(opdi::device_not_found),
        help(
            "Available devices: {available}\n\
             Add one with: opdi config init"
        )
    )]
    UnknownDevice { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(opdi::no_config),
        help(
            "Pass --url, or create a config with: opdi config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(opdi::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(opdi::config_write))]
    ConfigWrite(String),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(opdi::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(opdi::timeout),
        help("Increase timeout with --timeout or move closer to the device.")
    )]
    Timeout { seconds: u64 },

    #[error("{0}")]
    #[diagnostic(code(opdi::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::StreamUnavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::StreamUnavailable { reason } => CliError::StreamUnavailable { reason },

            CoreError::NotFound { message } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: message,
                list_command: "--help".into(),
            },

            CoreError::Rejected { status, message } => CliError::Rejected { status, message },

            CoreError::Decode { what, message } => CliError::Decode { what, message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotRunning => CliError::Internal("synchronizer is not running".into()),

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownDevice { name } => CliError::UnknownDevice {
                name,
                available: String::new(),
            },
            ConfigError::NoDevice => CliError::NoConfig {
                path: opdi_config::config_path().display().to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let cases = [
            (
                CliError::from(CoreError::ConnectionFailed {
                    reason: "refused".into(),
                }),
                exit_code::CONNECTION,
            ),
            (
                CliError::from(CoreError::Timeout { timeout_secs: 10 }),
                exit_code::TIMEOUT,
            ),
            (
                CliError::from(CoreError::Rejected {
                    status: 400,
                    message: "bad ssid".into(),
                }),
                exit_code::REJECTED,
            ),
            (
                CliError::from(CoreError::ValidationFailed {
                    message: "channel".into(),
                }),
                exit_code::USAGE,
            ),
            (
                CliError::from(CoreError::NotFound {
                    message: "profile".into(),
                }),
                exit_code::NOT_FOUND,
            ),
            (CliError::from(ConfigError::NoDevice), exit_code::GENERAL),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }
}
