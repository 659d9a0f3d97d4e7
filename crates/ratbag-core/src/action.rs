//! Button actions and the macro codec.
//!
//! An [`Action`] is what a button does when pressed. Macros are stored as
//! explicit press/release/wait events and rendered in a compact form where a
//! press immediately followed by the release of the same key collapses to a
//! single `↕KEY` glyph.
//!
//! The `action set macro` token grammar is:
//!
//! | Token        | Meaning                          |
//! |--------------|----------------------------------|
//! | `+KEY_A`     | press `A`                        |
//! | `-KEY_A`     | release `A`                      |
//! | `KEY_A`, `a` | tap `A` (press, then release)    |
//! | `t300`       | wait 300 milliseconds            |

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── Keys ────────────────────────────────────────────────────────────

/// Key names a macro may reference, without the `KEY_` prefix.
const KEY_NAMES: &[&str] = &[
    "ESC", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "MINUS", "EQUAL", "BACKSPACE",
    "TAB", "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "LEFTBRACE", "RIGHTBRACE",
    "ENTER", "LEFTCTRL", "A", "S", "D", "F", "G", "H", "J", "K", "L", "SEMICOLON",
    "APOSTROPHE", "GRAVE", "LEFTSHIFT", "BACKSLASH", "Z", "X", "C", "V", "B", "N", "M",
    "COMMA", "DOT", "SLASH", "RIGHTSHIFT", "KPASTERISK", "LEFTALT", "SPACE", "CAPSLOCK", "F1",
    "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14", "F15",
    "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24", "NUMLOCK", "SCROLLLOCK",
    "KP0", "KP1", "KP2", "KP3", "KP4", "KP5", "KP6", "KP7", "KP8", "KP9", "KPMINUS", "KPPLUS",
    "KPDOT", "KPENTER", "KPSLASH", "RIGHTCTRL", "RIGHTALT", "SYSRQ", "HOME", "UP", "PAGEUP",
    "LEFT", "RIGHT", "END", "DOWN", "PAGEDOWN", "INSERT", "DELETE", "PAUSE", "LEFTMETA",
    "RIGHTMETA", "COMPOSE", "MUTE", "VOLUMEDOWN", "VOLUMEUP", "PLAYPAUSE", "STOPCD",
    "PREVIOUSSONG", "NEXTSONG", "CALC", "MAIL", "WWW", "COPY", "PASTE", "CUT", "UNDO", "REDO",
    "FIND", "HELP", "MENU",
];

/// A keyboard key, normalized to its upper-case name without `KEY_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key(String);

impl Key {
    /// Parse a key name case-insensitively, with or without `KEY_`.
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.to_ascii_uppercase();
        let name = upper.strip_prefix("KEY_").unwrap_or(&upper);
        KEY_NAMES
            .iter()
            .find(|k| **k == name)
            .map(|k| Self((*k).to_owned()))
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("unknown key '{s}'"))
    }
}

impl From<Key> for String {
    fn from(k: Key) -> Self {
        k.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Macro events ────────────────────────────────────────────────────

/// One step of a macro. A tap is stored as a press followed by a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MacroEvent {
    Press { key: Key },
    Release { key: Key },
    Wait { ms: u32 },
}

/// Render events in the compact display form, `None` when empty.
pub fn render_macro(events: &[MacroEvent]) -> String {
    if events.is_empty() {
        return "None".into();
    }
    let mut parts = Vec::with_capacity(events.len());
    let mut iter = events.iter().peekable();
    while let Some(event) = iter.next() {
        match event {
            MacroEvent::Press { key } => {
                if matches!(iter.peek(), Some(MacroEvent::Release { key: next }) if next == key) {
                    iter.next();
                    parts.push(format!("↕{key}"));
                } else {
                    parts.push(format!("↓{key}"));
                }
            }
            MacroEvent::Release { key } => parts.push(format!("↑{key}")),
            MacroEvent::Wait { ms } => parts.push(format!("{ms}ms")),
        }
    }
    parts.join(" ")
}

/// Parse the token list of `action set macro`. No tokens means an empty macro.
pub fn parse_macro<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<MacroEvent>, CoreError> {
    let mut events = Vec::with_capacity(tokens.len() * 2);
    for token in tokens {
        let token = token.as_ref();
        if let Some(ms) = token.strip_prefix('t').and_then(parse_wait) {
            events.push(MacroEvent::Wait { ms });
        } else if let Some(name) = token.strip_prefix('+') {
            events.push(MacroEvent::Press {
                key: macro_key(name, token)?,
            });
        } else if let Some(name) = token.strip_prefix('-') {
            events.push(MacroEvent::Release {
                key: macro_key(name, token)?,
            });
        } else {
            let key = macro_key(token, token)?;
            events.push(MacroEvent::Press { key: key.clone() });
            events.push(MacroEvent::Release { key });
        }
    }
    Ok(events)
}

fn parse_wait(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn macro_key(name: &str, token: &str) -> Result<Key, CoreError> {
    Key::parse(name).ok_or_else(|| CoreError::argument(format!("invalid macro token '{token}'")))
}

// ── Actions ─────────────────────────────────────────────────────────

/// Special functions a button can trigger.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SpecialAction {
    Doubleclick,
    WheelLeft,
    WheelRight,
    WheelUp,
    WheelDown,
    RatchetModeSwitch,
    ResolutionCycleUp,
    ResolutionCycleDown,
    ResolutionUp,
    ResolutionDown,
    ResolutionAlternate,
    ResolutionDefault,
    ProfileCycleUp,
    ProfileCycleDown,
    ProfileUp,
    ProfileDown,
    SecondMode,
    BatteryLevel,
}

/// Discriminant of [`Action`], used for capability gating.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    None,
    Button,
    Special,
    Macro,
}

impl ActionKind {
    pub fn all() -> BTreeSet<Self> {
        <Self as strum::IntoEnumIterator>::iter().collect()
    }
}

/// What a button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    None,
    Button { target: u32 },
    Special { name: SpecialAction },
    Macro { events: Vec<MacroEvent> },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::None => ActionKind::None,
            Self::Button { .. } => ActionKind::Button,
            Self::Special { .. } => ActionKind::Special,
            Self::Macro { .. } => ActionKind::Macro,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("'none'"),
            Self::Button { target } => write!(f, "'button {target}'"),
            Self::Special { name } => write!(f, "'{name}'"),
            Self::Macro { events } => write!(f, "macro '{}'", render_macro(events)),
        }
    }
}
