// ── LED domain types ──

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest effect period a device accepts, in milliseconds.
pub const MAX_DURATION_MS: u32 = 10_000;

/// LED effect mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LedMode {
    Off,
    On,
    Cycle,
    Breathing,
}

impl LedMode {
    pub fn all() -> BTreeSet<Self> {
        <Self as strum::IntoEnumIterator>::iter().collect()
    }

    pub fn shows_color(self) -> bool {
        matches!(self, Self::On | Self::Breathing)
    }

    pub fn shows_effect(self) -> bool {
        matches!(self, Self::Cycle | Self::Breathing)
    }
}

/// Physical placement of an LED. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LedType {
    Logo,
    Side,
    Battery,
    Dpi,
    #[default]
    Unknown,
}

/// Color depth an LED can reproduce. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorDepth {
    Monochrome,
    #[default]
    Rgb,
    Rgb111,
}

// ── Color ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}': expected RRGGBB or 0xRRGGBB")]
pub struct ParseColorError(String);

/// 24-bit RGB color, displayed as lowercase `rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_owned()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ParseColorError(s.to_owned()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

// ── Led ─────────────────────────────────────────────────────────────

fn default_duration() -> u32 {
    1000
}

fn default_brightness() -> u8 {
    255
}

/// An LED on a profile.
///
/// Every effect field is stored regardless of mode, so switching modes
/// picks up the values the LED last had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub led_type: LedType,
    #[serde(default)]
    pub color_depth: ColorDepth,
    pub mode: LedMode,
    #[serde(default = "LedMode::all")]
    pub modes: BTreeSet<LedMode>,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_brightness")]
    pub brightness: u8,
}
