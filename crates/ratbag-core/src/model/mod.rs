// ── Device model ──
//
// In-memory tree of device state: Device -> Profiles -> {Resolutions,
// Buttons, LEDs}. Loaded once per session from the Device Service and
// mutated only through `Device::apply`.

pub mod button;
pub mod device;
pub mod led;
pub mod profile;
pub mod resolution;

pub use button::Button;
pub use device::Device;
pub use led::{Color, ColorDepth, Led, LedMode, LedType, ParseColorError};
pub use profile::{Profile, ProfileCapability};
pub use resolution::{Resolution, ResolutionCapability};

use crate::error::CoreError;

/// The closed set of entity kinds a command can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Device,
    Profile,
    Resolution,
    Button,
    Led,
}

impl EntityKind {
    /// Entity kinds that may appear as a `<kind> <index>` prefix pair.
    pub fn from_prefix(token: &str) -> Option<Self> {
        match token {
            "profile" => Some(Self::Profile),
            "resolution" => Some(Self::Resolution),
            "button" => Some(Self::Button),
            "led" => Some(Self::Led),
            _ => None,
        }
    }
}

/// A resolved position in the device tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Device,
    Profile { profile: usize },
    Resolution { profile: usize, resolution: usize },
    Button { profile: usize, button: usize },
    Led { profile: usize, led: usize },
}

impl Node {
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Device => EntityKind::Device,
            Self::Profile { .. } => EntityKind::Profile,
            Self::Resolution { .. } => EntityKind::Resolution,
            Self::Button { .. } => EntityKind::Button,
            Self::Led { .. } => EntityKind::Led,
        }
    }

    /// The owning profile, if the node lives below one.
    pub fn profile(self) -> Option<usize> {
        match self {
            Self::Device => None,
            Self::Profile { profile }
            | Self::Resolution { profile, .. }
            | Self::Button { profile, .. }
            | Self::Led { profile, .. } => Some(profile),
        }
    }
}

/// Look up `index` in `items`, reporting a miss as `IndexOutOfRange`.
pub(crate) fn lookup<T>(items: &[T], kind: EntityKind, index: usize) -> Result<&T, CoreError> {
    items.get(index).ok_or(CoreError::IndexOutOfRange {
        kind,
        index: i64::try_from(index).unwrap_or(i64::MAX),
        count: items.len(),
    })
}

pub(crate) fn lookup_mut<T>(
    items: &mut [T],
    kind: EntityKind,
    index: usize,
) -> Result<&mut T, CoreError> {
    let count = items.len();
    items.get_mut(index).ok_or(CoreError::IndexOutOfRange {
        kind,
        index: i64::try_from(index).unwrap_or(i64::MAX),
        count,
    })
}

/// Check a user-supplied signed index against a collection size.
pub(crate) fn checked_index(kind: EntityKind, index: i64, count: usize) -> Result<usize, CoreError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < count)
        .ok_or(CoreError::IndexOutOfRange { kind, index, count })
}
