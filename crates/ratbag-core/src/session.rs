// ── Session ──
//
// Owns the Device Service and the model loaded from it. One invocation
// holds its device's lock from resolution through synchronize, so
// concurrent commands against the same device run one after the other.

use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::command::Mutation;
use crate::error::{CoreError, exit_code};
use crate::format;
use crate::grammar::{self, Operation, Target};
use crate::model::Device;
use crate::service::{DeviceService, ServiceError};
use crate::validate;

/// Result of one invocation, shaped like a process exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn success(&self) -> bool {
        self.status == exit_code::SUCCESS
    }
}

pub struct Session<S> {
    service: S,
    devices: IndexMap<String, Mutex<Device>>,
}

impl<S: DeviceService> Session<S> {
    /// Fetch the initial state from `service` and index it by device id.
    pub async fn load(service: S) -> Result<Self, CoreError> {
        let mut devices = IndexMap::new();
        for mut device in service.devices().await? {
            device.reindex();
            if let Some(reason) = device.invariant_violation() {
                return Err(ServiceError::InvalidState { reason }.into());
            }
            if devices.contains_key(&device.id) {
                return Err(ServiceError::InvalidState {
                    reason: format!("device id '{}' appears twice", device.id),
                }
                .into());
            }
            devices.insert(device.id.clone(), Mutex::new(device));
        }
        debug!(devices = devices.len(), "session loaded");
        Ok(Self { service, devices })
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Current local state of one device.
    pub async fn device(&self, id: &str) -> Option<Device> {
        match self.devices.get(id) {
            Some(cell) => Some(cell.lock().await.clone()),
            None => None,
        }
    }

    /// Run one command line and return its output text.
    pub async fn execute(&self, tokens: &[String]) -> Result<String, CoreError> {
        let (id, rest) = match grammar::split(tokens)? {
            Target::List => return Ok(self.list().await),
            Target::Device { id, rest } => (id, rest),
        };
        let cell = self
            .devices
            .get(id)
            .ok_or_else(|| CoreError::UnknownDevice { id: id.to_owned() })?;
        let mut device = cell.lock().await;

        let (node, op) = grammar::resolve(&device, rest)?;
        debug!(device = id, profile = ?node.profile(), ?node, ?op, "resolved command");

        match op {
            Operation::Query(query) => format::render(&device, node, query),
            Operation::Change(change) => {
                let mutation = validate::plan(&device, node, &change)?;
                device.apply(&mutation)?;
                info!(
                    device = id,
                    profile = ?mutation.profile(),
                    method = mutation.method_name(),
                    "applied change"
                );
                self.commit(id, &mutation).await?;
                Ok(String::new())
            }
        }
    }

    /// [`execute`](Self::execute), folded into an exit status and streams.
    pub async fn run(&self, tokens: &[String]) -> Outcome {
        match self.execute(tokens).await {
            Ok(stdout) => Outcome {
                status: exit_code::SUCCESS,
                stdout,
                stderr: String::new(),
            },
            Err(err) => Outcome {
                status: err.exit_code(),
                stdout: String::new(),
                stderr: err.to_string(),
            },
        }
    }

    async fn list(&self) -> String {
        let mut devices = Vec::with_capacity(self.devices.len());
        for cell in self.devices.values() {
            devices.push(cell.lock().await.clone());
        }
        format::device_list(&devices)
    }

    /// Hand the mutation to the service, then wait for it to commit.
    async fn commit(&self, id: &str, mutation: &Mutation) -> Result<(), ServiceError> {
        let result = match self.service.call(id, mutation).await {
            Ok(()) => self.service.synchronize().await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(device = id, method = mutation.method_name(), error = %e, "service call failed");
        }
        result
    }
}
