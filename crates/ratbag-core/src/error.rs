// ── Core error types ──
//
// Every failure a command can hit, grouped into six kinds so callers can
// tell malformed input from forbidden input from transport trouble.
// Validation runs to completion before any write, so every variant except
// `Service` guarantees the device model is untouched.

use thiserror::Error;

use crate::model::EntityKind;
use crate::service::ServiceError;

/// Process exit codes, one per [`ErrorKind`].
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const RANGE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CAPABILITY: i32 = 5;
    pub const SERVICE: i32 = 7;
}

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    UnknownCommand,
    IndexOutOfRange,
    Argument,
    Range,
    Capability,
    Service,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::UnknownCommand | Self::Argument => exit_code::USAGE,
            Self::Range => exit_code::RANGE,
            Self::IndexOutOfRange => exit_code::NOT_FOUND,
            Self::Capability => exit_code::CAPABILITY,
            Self::Service => exit_code::SERVICE,
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Grammar ──────────────────────────────────────────────────────
    #[error("unknown device '{id}'")]
    UnknownDevice { id: String },

    #[error("missing command after {context}")]
    MissingCommand { context: String },

    #[error("unknown command '{token}' for {context}")]
    UnknownCommand { token: String, context: String },

    #[error("'{kind}' given twice in the same command")]
    DuplicatePrefix { kind: EntityKind },

    // ── Addressing ───────────────────────────────────────────────────
    #[error("{kind} {index} does not exist ({count} available)")]
    IndexOutOfRange {
        kind: EntityKind,
        index: i64,
        count: usize,
    },

    #[error("device '{device}' has no active profile")]
    NoActiveProfile { device: String },

    #[error("profile {profile} has no active resolution")]
    NoActiveResolution { profile: usize },

    #[error("profile {profile} has no default resolution")]
    NoDefaultResolution { profile: usize },

    // ── Arguments ────────────────────────────────────────────────────
    #[error("{message}")]
    Argument { message: String },

    #[error("{field} {value} is out of range: {reason}")]
    Range {
        field: &'static str,
        value: i64,
        reason: String,
    },

    #[error("cannot {operation}: {reason}")]
    Capability { operation: String, reason: String },

    // ── Device Service ───────────────────────────────────────────────
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CoreError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    pub fn capability(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Capability {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDevice { .. }
            | Self::MissingCommand { .. }
            | Self::UnknownCommand { .. }
            | Self::DuplicatePrefix { .. } => ErrorKind::UnknownCommand,
            Self::IndexOutOfRange { .. }
            | Self::NoActiveProfile { .. }
            | Self::NoActiveResolution { .. }
            | Self::NoDefaultResolution { .. } => ErrorKind::IndexOutOfRange,
            Self::Argument { .. } => ErrorKind::Argument,
            Self::Range { .. } => ErrorKind::Range,
            Self::Capability { .. } => ErrorKind::Capability,
            Self::Service(_) => ErrorKind::Service,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
