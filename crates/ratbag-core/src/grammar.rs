//! Command grammar resolver.
//!
//! Turns `<device> [profile N] [resolution N|button N|led N] <verb> [args...]`
//! into a resolved [`Node`] plus a typed [`Operation`]. Resolution is a
//! recursive descent: each `<kind> <index>` prefix narrows the cursor one
//! level, then the verb table of the entity kind the cursor landed on takes
//! over. Resolving never touches device state beyond reading it.
//!
//! Integer arguments are parsed as `i64`; whether a value is acceptable for
//! a field is the validation layer's call.

use crate::action::{self, ActionKind, MacroEvent, SpecialAction};
use crate::error::CoreError;
use crate::model::{Color, Device, EntityKind, LedMode, Node, checked_index};

// ── Resolved commands ───────────────────────────────────────────────

/// First-token split of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'t> {
    /// `list`: enumerate devices.
    List,
    /// A device identifier followed by the rest of the command.
    Device { id: &'t str, rest: &'t [String] },
}

/// What a resolved command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Query(Query),
    Change(Change),
}

/// Read-only verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Info,
    Name,
    Profile,
    ProfileName,
    ActiveProfile,
    Resolution,
    ActiveResolution,
    DefaultResolution,
    ResolutionDisabled,
    ResolutionEnabled,
    Dpi,
    DpiAll,
    Rate,
    RateAll,
    ButtonCount,
    LedCount,
    Button,
    Led,
    LedModes,
}

/// Mutating verbs with parsed, not yet validated, arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ProfileName(String),
    ActiveProfile(i64),
    ProfileEnabled(bool),
    ActiveResolution(i64),
    DefaultResolution(i64),
    ResolutionEnabled(bool),
    Dpi(DpiValue),
    Rate(i64),
    ButtonAction(ActionRequest),
    Led(Vec<LedPatch>),
}

/// Argument of `dpi set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiValue {
    /// `N` or `Ndpi`: both axes, must be a declared step.
    Single(i64),
    /// `NxM` or `NxMdpi`: explicit axes.
    Pair(i64, i64),
}

/// Argument of `action set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    None,
    Button(i64),
    Special(SpecialAction),
    Macro(Vec<MacroEvent>),
}

impl ActionRequest {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::None => ActionKind::None,
            Self::Button(_) => ActionKind::Button,
            Self::Special(_) => ActionKind::Special,
            Self::Macro(_) => ActionKind::Macro,
        }
    }
}

/// One `<field> <value>` pair of `led N set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedPatch {
    Mode(LedMode),
    Duration(i64),
    Brightness(i64),
    Color(Color),
}

// ── Token cursor ────────────────────────────────────────────────────

struct Tokens<'t> {
    items: &'t [String],
    pos: usize,
}

impl<'t> Tokens<'t> {
    fn new(items: &'t [String]) -> Self {
        Self { items, pos: 0 }
    }

    fn peek(&self) -> Option<&'t str> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t str> {
        self.items.get(self.pos + n).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.items.len());
    }

    /// Next token as a verb; running out is an unknown command.
    fn verb(&mut self, context: &str) -> Result<&'t str, CoreError> {
        self.next().ok_or_else(|| CoreError::MissingCommand {
            context: context.to_owned(),
        })
    }

    /// Next token as a required argument.
    fn arg(&mut self, what: &str) -> Result<&'t str, CoreError> {
        self.next()
            .ok_or_else(|| CoreError::argument(format!("missing {what}")))
    }

    fn int(&mut self, what: &str) -> Result<i64, CoreError> {
        let raw = self.arg(what)?;
        raw.parse()
            .map_err(|_| CoreError::argument(format!("invalid {what} '{raw}': expected an integer")))
    }

    fn rest(&mut self) -> &'t [String] {
        let rest = self.items.get(self.pos..).unwrap_or_default();
        self.pos = self.items.len();
        rest
    }

    fn finish(&self) -> Result<(), CoreError> {
        match self.peek() {
            None => Ok(()),
            Some(extra) => Err(CoreError::argument(format!(
                "unexpected trailing argument '{extra}'"
            ))),
        }
    }
}

fn unknown(token: &str, context: &str) -> CoreError {
    CoreError::UnknownCommand {
        token: token.to_owned(),
        context: context.to_owned(),
    }
}

// ── Entry points ────────────────────────────────────────────────────

/// Split off the device identifier, or recognize `list`.
pub fn split(tokens: &[String]) -> Result<Target<'_>, CoreError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(CoreError::MissingCommand {
            context: "ratbagctl".into(),
        });
    };
    if first == "list" {
        Tokens::new(rest).finish()?;
        return Ok(Target::List);
    }
    Ok(Target::Device {
        id: first.as_str(),
        rest,
    })
}

/// Resolve the tokens after the device identifier against `device`.
pub fn resolve(device: &Device, tokens: &[String]) -> Result<(Node, Operation), CoreError> {
    let mut tokens = Tokens::new(tokens);
    let node = narrow(device, &mut tokens, Node::Device)?;
    let resolved = dispatch(device, node, &mut tokens)?;
    tokens.finish()?;
    Ok(resolved)
}

// ── Prefix narrowing ────────────────────────────────────────────────

/// Consume `<kind> <index>` pairs, one level per call.
fn narrow(device: &Device, tokens: &mut Tokens<'_>, node: Node) -> Result<Node, CoreError> {
    let Some(kind) = tokens.peek().and_then(EntityKind::from_prefix) else {
        return Ok(node);
    };
    if node.kind() == kind {
        return Err(CoreError::DuplicatePrefix { kind });
    }
    let Some(index) = tokens.peek_nth(1).and_then(prefix_index) else {
        return Ok(node);
    };
    tokens.skip(2);

    let next = match (node, kind) {
        (Node::Device, EntityKind::Profile) => Node::Profile {
            profile: checked_index(EntityKind::Profile, index, device.profiles.len())?,
        },
        (Node::Device, child) => child_node(device, active_profile(device)?, child, index)?,
        (Node::Profile { profile }, child) if child != EntityKind::Profile => {
            child_node(device, profile, child, index)?
        }
        (current, kind) => {
            let token: &'static str = kind.into();
            let context: &'static str = current.kind().into();
            return Err(unknown(token, context));
        }
    };
    narrow(device, tokens, next)
}

/// An optionally signed run of digits. Values past `i64` saturate, so
/// they still land as out of range rather than as a verb.
fn prefix_index(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(if token.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

fn child_node(
    device: &Device,
    profile: usize,
    kind: EntityKind,
    index: i64,
) -> Result<Node, CoreError> {
    let p = device.profile(profile)?;
    Ok(match kind {
        EntityKind::Resolution => Node::Resolution {
            profile,
            resolution: checked_index(kind, index, p.resolutions.len())?,
        },
        EntityKind::Button => Node::Button {
            profile,
            button: checked_index(kind, index, p.buttons.len())?,
        },
        EntityKind::Led => Node::Led {
            profile,
            led: checked_index(kind, index, p.leds.len())?,
        },
        EntityKind::Device | EntityKind::Profile => {
            return Err(CoreError::DuplicatePrefix { kind });
        }
    })
}

fn active_profile(device: &Device) -> Result<usize, CoreError> {
    device.active_profile().ok_or_else(|| CoreError::NoActiveProfile {
        device: device.id.clone(),
    })
}

fn active_resolution(device: &Device, profile: usize) -> Result<usize, CoreError> {
    device
        .profile(profile)?
        .active_resolution()
        .ok_or(CoreError::NoActiveResolution { profile })
}

// ── Verb tables ─────────────────────────────────────────────────────

fn dispatch(
    device: &Device,
    node: Node,
    tokens: &mut Tokens<'_>,
) -> Result<(Node, Operation), CoreError> {
    match node {
        Node::Device => device_verbs(device, tokens),
        Node::Profile { profile } => match tokens.peek() {
            Some(family @ ("resolution" | "dpi" | "rate" | "button" | "led")) => {
                tokens.skip(1);
                family_verbs(device, profile, family, tokens)
            }
            _ => profile_verbs(profile, tokens),
        },
        Node::Resolution { .. } => resolution_verbs(node, tokens),
        Node::Button { .. } => button_verbs(node, tokens),
        Node::Led { .. } => led_verbs(node, tokens),
    }
}

fn device_verbs(device: &Device, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    match tokens.verb("device")? {
        "info" => Ok((Node::Device, Operation::Query(Query::Info))),
        "name" => Ok((Node::Device, Operation::Query(Query::Name))),
        "profile" => {
            if tokens.peek() == Some("active") {
                tokens.skip(1);
                return match tokens.verb("profile active")? {
                    "get" => Ok((Node::Device, Operation::Query(Query::ActiveProfile))),
                    "set" => Ok((
                        Node::Device,
                        Operation::Change(Change::ActiveProfile(tokens.int("profile index")?)),
                    )),
                    other => Err(unknown(other, "profile active")),
                };
            }
            profile_verbs(active_profile(device)?, tokens)
        }
        family @ ("resolution" | "dpi" | "rate" | "button" | "led") => {
            family_verbs(device, active_profile(device)?, family, tokens)
        }
        other => Err(unknown(other, "device")),
    }
}

fn profile_verbs(profile: usize, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    let node = Node::Profile { profile };
    let op = match tokens.verb("profile")? {
        "get" => Operation::Query(Query::Profile),
        "name" => match tokens.verb("profile name")? {
            "get" => Operation::Query(Query::ProfileName),
            "set" => Operation::Change(Change::ProfileName(tokens.arg("profile name")?.to_owned())),
            other => return Err(unknown(other, "profile name")),
        },
        "enable" => Operation::Change(Change::ProfileEnabled(true)),
        "disable" => Operation::Change(Change::ProfileEnabled(false)),
        other => return Err(unknown(other, "profile")),
    };
    Ok((node, op))
}

/// Families scoped to a profile: `resolution`, `dpi`, `rate`, `button`, `led`.
fn family_verbs(
    device: &Device,
    profile: usize,
    family: &str,
    tokens: &mut Tokens<'_>,
) -> Result<(Node, Operation), CoreError> {
    let node = Node::Profile { profile };
    let op = match family {
        "resolution" => {
            let which = tokens.verb("resolution")?;
            let (get, set) = match which {
                "active" => (Query::ActiveResolution, Change::ActiveResolution as fn(i64) -> Change),
                "default" => (Query::DefaultResolution, Change::DefaultResolution as fn(i64) -> Change),
                other => return Err(unknown(other, "resolution")),
            };
            match tokens.verb(&format!("resolution {which}"))? {
                "get" => Operation::Query(get),
                "set" => Operation::Change(set(tokens.int("resolution index")?)),
                other => return Err(unknown(other, &format!("resolution {which}"))),
            }
        }
        "dpi" => {
            let resolution = active_resolution(device, profile)?;
            return dpi_verbs(Node::Resolution { profile, resolution }, tokens);
        }
        "rate" => match tokens.verb("rate")? {
            "get" => Operation::Query(Query::Rate),
            "get-all" => Operation::Query(Query::RateAll),
            "set" => Operation::Change(Change::Rate(tokens.int("report rate")?)),
            other => return Err(unknown(other, "rate")),
        },
        "button" => match tokens.verb("button")? {
            "count" => Operation::Query(Query::ButtonCount),
            other => return Err(unknown(other, "button")),
        },
        "led" => match tokens.verb("led")? {
            "count" => Operation::Query(Query::LedCount),
            other => return Err(unknown(other, "led")),
        },
        other => return Err(unknown(other, "profile")),
    };
    Ok((node, op))
}

fn resolution_verbs(node: Node, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    let op = match tokens.verb("resolution")? {
        "get" => Operation::Query(Query::Resolution),
        "dpi" => return dpi_verbs(node, tokens),
        flag @ ("disabled" | "enabled") => {
            let enabled = flag == "enabled";
            match tokens.verb(&format!("resolution {flag}"))? {
                "get" if enabled => Operation::Query(Query::ResolutionEnabled),
                "get" => Operation::Query(Query::ResolutionDisabled),
                "set" => Operation::Change(Change::ResolutionEnabled(enabled)),
                other => return Err(unknown(other, &format!("resolution {flag}"))),
            }
        }
        other => return Err(unknown(other, "resolution")),
    };
    Ok((node, op))
}

fn dpi_verbs(node: Node, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    let op = match tokens.verb("dpi")? {
        "get" => Operation::Query(Query::Dpi),
        "get-all" => Operation::Query(Query::DpiAll),
        "set" => Operation::Change(Change::Dpi(parse_dpi(tokens.arg("dpi value")?)?)),
        other => return Err(unknown(other, "dpi")),
    };
    Ok((node, op))
}

fn button_verbs(node: Node, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    let op = match tokens.verb("button")? {
        "get" => Operation::Query(Query::Button),
        "action" => match tokens.verb("button action")? {
            "get" => Operation::Query(Query::Button),
            "set" => Operation::Change(Change::ButtonAction(parse_action(tokens)?)),
            other => return Err(unknown(other, "button action")),
        },
        other => return Err(unknown(other, "button")),
    };
    Ok((node, op))
}

fn led_verbs(node: Node, tokens: &mut Tokens<'_>) -> Result<(Node, Operation), CoreError> {
    let op = match tokens.verb("led")? {
        "get" => Operation::Query(Query::Led),
        "capabilities" => Operation::Query(Query::LedModes),
        "set" => Operation::Change(Change::Led(parse_led_patches(tokens)?)),
        other => return Err(unknown(other, "led")),
    };
    Ok((node, op))
}

// ── Argument parsers ────────────────────────────────────────────────

/// `N`, `Ndpi`, `NxM` or `NxMdpi`.
pub fn parse_dpi(raw: &str) -> Result<DpiValue, CoreError> {
    let invalid = || CoreError::argument(format!("invalid dpi value '{raw}': expected N or NxM"));
    let body = raw.strip_suffix("dpi").unwrap_or(raw);
    let int = |s: &str| s.parse::<i64>().map_err(|_| invalid());
    match body.split_once('x') {
        Some((x, y)) => Ok(DpiValue::Pair(int(x)?, int(y)?)),
        None => Ok(DpiValue::Single(int(body)?)),
    }
}

fn parse_action(tokens: &mut Tokens<'_>) -> Result<ActionRequest, CoreError> {
    let raw = tokens.arg("action type")?;
    let kind: ActionKind = raw.parse().map_err(|_| {
        CoreError::argument(format!(
            "invalid action type '{raw}': expected none, button, special or macro"
        ))
    })?;
    Ok(match kind {
        ActionKind::None => ActionRequest::None,
        ActionKind::Button => ActionRequest::Button(tokens.int("button number")?),
        ActionKind::Special => {
            let name = tokens.arg("special action name")?;
            let special = name.parse::<SpecialAction>().map_err(|_| {
                CoreError::argument(format!(
                    "unknown special action '{name}': expected one of {}",
                    <SpecialAction as strum::VariantNames>::VARIANTS.join(", ")
                ))
            })?;
            ActionRequest::Special(special)
        }
        ActionKind::Macro => ActionRequest::Macro(action::parse_macro(tokens.rest())?),
    })
}

fn parse_led_patches(tokens: &mut Tokens<'_>) -> Result<Vec<LedPatch>, CoreError> {
    let mut patches = Vec::new();
    while let Some(field) = tokens.next() {
        let patch = match field {
            "mode" => {
                let raw = tokens.arg("LED mode")?;
                LedPatch::Mode(raw.parse::<LedMode>().map_err(|_| {
                    CoreError::argument(format!(
                        "invalid LED mode '{raw}': expected one of {}",
                        <LedMode as strum::VariantNames>::VARIANTS.join(", ")
                    ))
                })?)
            }
            "duration" => LedPatch::Duration(tokens.int("duration")?),
            "brightness" => LedPatch::Brightness(tokens.int("brightness")?),
            "color" => {
                let raw = tokens.arg("color")?;
                LedPatch::Color(
                    raw.parse::<Color>()
                        .map_err(|e| CoreError::argument(e.to_string()))?,
                )
            }
            other => {
                return Err(CoreError::argument(format!(
                    "unknown LED field '{other}': expected mode, duration, brightness or color"
                )));
            }
        };
        patches.push(patch);
    }
    if patches.is_empty() {
        return Err(CoreError::argument("led set needs at least one field"));
    }
    Ok(patches)
}
