//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ratbag_config::ConfigError;
use ratbag_core::{CoreError, ErrorKind, exit_code};

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Command grammar ──────────────────────────────────────────────

    #[error("unknown device '{id}'")]
    #[diagnostic(
        code(ratbagctl::unknown_device),
        help("Run: ratbagctl list to see available devices")
    )]
    UnknownDevice { id: String },

    #[error("{message}")]
    #[diagnostic(
        code(ratbagctl::usage),
        help("Usage: ratbagctl <device> [profile N] [resolution N|button N|led N] <verb> [args...]")
    )]
    Usage { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(ratbagctl::not_found),
        help("Run: ratbagctl {device} info to see what the device has")
    )]
    NotFound { message: String, device: String },

    // ── Arguments ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(ratbagctl::invalid_argument))]
    InvalidArgument { message: String },

    #[error("{message}")]
    #[diagnostic(code(ratbagctl::out_of_range))]
    OutOfRange { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(ratbagctl::unsupported),
        help("The device does not allow this change. Run: ratbagctl {device} info")
    )]
    Unsupported { message: String, device: String },

    // ── Device Service ───────────────────────────────────────────────

    #[error("device service error: {message}")]
    #[diagnostic(
        code(ratbagctl::service),
        help("Point --state-file or RATBAGCTL_STATE_FILE at a device state file.")
    )]
    Service { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found")]
    #[diagnostic(
        code(ratbagctl::no_config),
        help("Expected at: {path}")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(ratbagctl::config))]
    Config(#[from] ConfigError),
}

impl CliError {
    /// Classify a core error, naming `device` in the help text.
    pub fn from_core(err: CoreError, device: &str) -> Self {
        let device = device.to_owned();
        let message = err.to_string();
        let kind = match err {
            CoreError::UnknownDevice { id } => return Self::UnknownDevice { id },
            other => other.kind(),
        };
        match kind {
            ErrorKind::UnknownCommand => Self::Usage { message },
            ErrorKind::IndexOutOfRange => Self::NotFound { message, device },
            ErrorKind::Argument => Self::InvalidArgument { message },
            ErrorKind::Range => Self::OutOfRange { message },
            ErrorKind::Capability => Self::Unsupported { message, device },
            ErrorKind::Service => Self::Service { message },
        }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownDevice { .. } | Self::Usage { .. } | Self::InvalidArgument { .. } => {
                exit_code::USAGE
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::OutOfRange { .. } => exit_code::RANGE,
            Self::Unsupported { .. } => exit_code::CAPABILITY,
            Self::Service { .. } => exit_code::SERVICE,
            Self::NoConfig { .. } | Self::Config(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err, "<device>")
    }
}
