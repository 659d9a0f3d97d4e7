// ── File-backed Device Service ──
//
// Keeps its own copy of the device tree, optionally loaded from and written
// back to a JSON state file. Every call is recorded so tests can assert on
// exactly what reached the service.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::{DeviceService, ServiceError};
use crate::command::Mutation;
use crate::model::Device;

/// On-disk layout of a state file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFile {
    pub devices: Vec<Device>,
}

/// One method invocation as the service received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCall {
    pub device_id: String,
    pub method: &'static str,
    pub mutation: Mutation,
}

#[derive(Debug)]
pub struct FixtureService {
    devices: Mutex<Vec<Device>>,
    path: Option<PathBuf>,
    calls: Mutex<Vec<ServiceCall>>,
    dirty: AtomicBool,
    fail_sync: AtomicBool,
}

impl FixtureService {
    /// In-memory service with no backing file.
    pub fn new(devices: Vec<Device>) -> Self {
        Self::build(devices, None)
    }

    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        let state: StateFile = serde_json::from_str(json)?;
        Ok(Self::new(state.devices))
    }

    /// Load `path`; `synchronize` writes changes back to it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ServiceError::Io {
                path: path.clone(),
                source,
            })?;
        let state: StateFile = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), devices = state.devices.len(), "loaded state file");
        Ok(Self::build(state.devices, Some(path)))
    }

    fn build(devices: Vec<Device>, path: Option<PathBuf>) -> Self {
        Self {
            devices: Mutex::new(devices),
            path,
            calls: Mutex::new(Vec::new()),
            dirty: AtomicBool::new(false),
            fail_sync: AtomicBool::new(false),
        }
    }

    /// Make every following `synchronize` fail.
    pub fn fail_synchronize(&self, fail: bool) {
        self.fail_sync.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().await.clone()
    }

    /// The service's own view of the devices.
    pub async fn snapshot(&self) -> Vec<Device> {
        self.devices.lock().await.clone()
    }
}

impl DeviceService for FixtureService {
    async fn devices(&self) -> Result<Vec<Device>, ServiceError> {
        Ok(self.snapshot().await)
    }

    async fn call(&self, device_id: &str, mutation: &Mutation) -> Result<(), ServiceError> {
        let method = mutation.method_name();
        {
            let mut devices = self.devices.lock().await;
            let device = devices
                .iter_mut()
                .find(|d| d.id == device_id)
                .ok_or_else(|| ServiceError::UnknownDevice {
                    id: device_id.to_owned(),
                })?;
            device
                .apply(mutation)
                .map_err(|e| ServiceError::Rejected {
                    method,
                    reason: e.to_string(),
                })?;
        }
        self.calls.lock().await.push(ServiceCall {
            device_id: device_id.to_owned(),
            method,
            mutation: mutation.clone(),
        });
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn synchronize(&self) -> Result<(), ServiceError> {
        if self.fail_sync.load(Ordering::SeqCst) {
            return Err(ServiceError::SyncFailed {
                reason: "service unavailable".into(),
            });
        }
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let state = StateFile {
            devices: self.snapshot().await,
        };
        let json = serde_json::to_string_pretty(&state)?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| ServiceError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "wrote state file");
        Ok(())
    }
}
