// ── Resolution domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Capability flags a resolution may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionCapability {
    /// X and Y may differ.
    SeparateXy,
    /// The resolution can be disabled.
    Disable,
}

/// A DPI slot within a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Resolution {
    #[serde(default)]
    pub index: usize,
    pub xres: u32,
    pub yres: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub capabilities: BTreeSet<ResolutionCapability>,
    pub dpi_min: u32,
    pub dpi_max: u32,
    /// Discrete steps the device accepts for single-value changes. Empty
    /// means any value in `[dpi_min, dpi_max]`.
    #[serde(default)]
    pub dpi_list: Vec<u32>,
}

impl Resolution {
    pub fn has(&self, cap: ResolutionCapability) -> bool {
        self.capabilities.contains(&cap)
    }

    /// Whether the resolution renders as `XxY` rather than a single value.
    pub fn is_split(&self) -> bool {
        self.xres != self.yres || self.has(ResolutionCapability::SeparateXy)
    }
}
