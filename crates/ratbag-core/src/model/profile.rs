// ── Profile domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Button, EntityKind, Led, Resolution, lookup, lookup_mut};
use crate::error::CoreError;

/// Capability flags a profile may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileCapability {
    WritableName,
    Disable,
}

/// A configuration slot on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capabilities: BTreeSet<ProfileCapability>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_disabled: bool,
    pub report_rate: u32,
    #[serde(default)]
    pub report_rates: Vec<u32>,
    #[serde(default)]
    pub resolutions: Vec<Resolution>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub leds: Vec<Led>,
}

impl Profile {
    pub fn has(&self, cap: ProfileCapability) -> bool {
        self.capabilities.contains(&cap)
    }

    pub fn resolution(&self, index: usize) -> Result<&Resolution, CoreError> {
        lookup(&self.resolutions, EntityKind::Resolution, index)
    }

    pub fn button(&self, index: usize) -> Result<&Button, CoreError> {
        lookup(&self.buttons, EntityKind::Button, index)
    }

    pub fn led(&self, index: usize) -> Result<&Led, CoreError> {
        lookup(&self.leds, EntityKind::Led, index)
    }

    pub fn active_resolution(&self) -> Option<usize> {
        self.resolutions.iter().position(|r| r.is_active)
    }

    pub fn default_resolution(&self) -> Option<usize> {
        self.resolutions.iter().position(|r| r.is_default)
    }

    // ── Mutation (called from `Device::apply`) ───────────────────────

    pub(crate) fn resolution_mut(&mut self, index: usize) -> Result<&mut Resolution, CoreError> {
        lookup_mut(&mut self.resolutions, EntityKind::Resolution, index)
    }

    pub(crate) fn button_mut(&mut self, index: usize) -> Result<&mut Button, CoreError> {
        lookup_mut(&mut self.buttons, EntityKind::Button, index)
    }

    pub(crate) fn led_mut(&mut self, index: usize) -> Result<&mut Led, CoreError> {
        lookup_mut(&mut self.leds, EntityKind::Led, index)
    }

    /// Make `index` the only active resolution.
    pub(crate) fn set_active_resolution(&mut self, index: usize) -> Result<(), CoreError> {
        self.resolution(index)?;
        for (i, r) in self.resolutions.iter_mut().enumerate() {
            r.is_active = i == index;
        }
        Ok(())
    }

    /// Make `index` the only default resolution.
    pub(crate) fn set_default_resolution(&mut self, index: usize) -> Result<(), CoreError> {
        self.resolution(index)?;
        for (i, r) in self.resolutions.iter_mut().enumerate() {
            r.is_default = i == index;
        }
        Ok(())
    }

    pub(crate) fn reindex(&mut self) {
        for (i, r) in self.resolutions.iter_mut().enumerate() {
            r.index = i;
        }
        for (i, b) in self.buttons.iter_mut().enumerate() {
            b.index = i;
        }
        for (i, l) in self.leds.iter_mut().enumerate() {
            l.index = i;
        }
    }
}
