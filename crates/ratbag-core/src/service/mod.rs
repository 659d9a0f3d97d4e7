// ── Device Service contract ──
//
// The background service that owns the hardware. The CLI only ever sees
// it through this trait: an initial snapshot, one typed call per change,
// and a synchronize barrier after each mutating command.

mod fixture;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::command::Mutation;
use crate::model::Device;

pub use fixture::{FixtureService, ServiceCall, StateFile};

/// Failures reported by a [`DeviceService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    // ── Addressing ──────────────────────────────────────────────────
    #[error("service has no device '{id}'")]
    UnknownDevice { id: String },

    // ── Calls ───────────────────────────────────────────────────────
    /// The service refused a method call.
    #[error("service rejected {method}: {reason}")]
    Rejected { method: &'static str, reason: String },

    #[error("synchronize failed: {reason}")]
    SyncFailed { reason: String },

    // ── State file ──────────────────────────────────────────────────
    #[error("state file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed device state: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot breaks a model invariant.
    #[error("invalid device state: {reason}")]
    InvalidState { reason: String },
}

/// Contract with the background configuration service.
pub trait DeviceService: Send + Sync {
    /// Current state of every device the service manages.
    fn devices(&self) -> impl Future<Output = Result<Vec<Device>, ServiceError>> + Send;

    /// Invoke one method on a device object.
    fn call(
        &self,
        device_id: &str,
        mutation: &Mutation,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// Barrier: returns once every preceding call has been committed.
    fn synchronize(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
