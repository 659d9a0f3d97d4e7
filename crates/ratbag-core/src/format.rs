// ── Response formatter ──
//
// Canonical text for every read verb. Output never ends in a newline; the
// caller decides how to print it.

use std::fmt::Write as _;

use crate::error::CoreError;
use crate::grammar::Query;
use crate::model::{Button, Device, Led, Node, Profile, Resolution};

/// Render the answer to `query` at `node`.
pub fn render(device: &Device, node: Node, query: Query) -> Result<String, CoreError> {
    Ok(match (node, query) {
        (Node::Device, Query::Info) => info(device),
        (Node::Device, Query::Name) => device.name.clone(),
        (Node::Device, Query::ActiveProfile) => device
            .active_profile()
            .ok_or_else(|| CoreError::NoActiveProfile {
                device: device.id.clone(),
            })?
            .to_string(),
        (Node::Profile { profile }, query) => profile_query(device.profile(profile)?, query)?,
        (Node::Resolution { profile, resolution }, query) => {
            let r = device.profile(profile)?.resolution(resolution)?;
            match query {
                Query::Resolution => resolution_line(r),
                Query::Dpi => dpi(r),
                Query::DpiAll => join(&r.dpi_list),
                Query::ResolutionDisabled => r.is_disabled.to_string(),
                Query::ResolutionEnabled => (!r.is_disabled).to_string(),
                other => return Err(misplaced(node, other)),
            }
        }
        (Node::Button { profile, button }, Query::Button) => {
            button_line(device.profile(profile)?.button(button)?)
        }
        (Node::Led { profile, led }, Query::Led) => led_line(device.profile(profile)?.led(led)?),
        (Node::Led { profile, led }, Query::LedModes) => {
            led_modes(device.profile(profile)?.led(led)?)
        }
        (node, query) => return Err(misplaced(node, query)),
    })
}

fn profile_query(p: &Profile, query: Query) -> Result<String, CoreError> {
    Ok(match query {
        Query::Profile => profile_block(p),
        Query::ProfileName => p.name.clone(),
        Query::ActiveResolution => p
            .active_resolution()
            .ok_or(CoreError::NoActiveResolution { profile: p.index })?
            .to_string(),
        Query::DefaultResolution => p
            .default_resolution()
            .ok_or(CoreError::NoDefaultResolution { profile: p.index })?
            .to_string(),
        Query::Rate => p.report_rate.to_string(),
        Query::RateAll => join(&p.report_rates),
        Query::ButtonCount => p.buttons.len().to_string(),
        Query::LedCount => p.leds.len().to_string(),
        other => return Err(misplaced(Node::Profile { profile: p.index }, other)),
    })
}

fn misplaced(node: Node, query: Query) -> CoreError {
    CoreError::UnknownCommand {
        token: format!("{query:?}").to_lowercase(),
        context: node.kind().to_string(),
    }
}

// ── Listings ────────────────────────────────────────────────────────

/// One line per device: the id column padded to 20, then the name.
pub fn device_list<'a>(devices: impl IntoIterator<Item = &'a Device>) -> String {
    devices
        .into_iter()
        .map(|d| format!("{:<20} {}", format!("{}:", d.id), d.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn info(device: &Device) -> String {
    let mut out = format!("{} - {}", device.id, device.name);
    let _ = write!(out, "\n  Model: {}", device.model);
    let _ = write!(out, "\n  Firmware: {}", device.firmware_version);
    let _ = write!(out, "\n  Number of Profiles: {}", device.profiles.len());
    for p in &device.profiles {
        out.push('\n');
        out.push_str(&profile_block(p));
    }
    out
}

pub fn profile_block(p: &Profile) -> String {
    let mut out = format!("Profile {}:", p.index);
    if p.is_active {
        out.push_str(" (active)");
    }
    if p.is_disabled {
        out.push_str(" (disabled)");
    }
    let name = if p.name.is_empty() { "n/a" } else { &p.name };
    let _ = write!(out, "\n  Name: {name}");
    let _ = write!(out, "\n  Report Rate: {}Hz", p.report_rate);
    out.push_str("\n  Resolutions:");
    for r in &p.resolutions {
        let _ = write!(out, "\n    {}", resolution_line(r));
    }
    for b in &p.buttons {
        let _ = write!(out, "\n  {}", button_line(b));
    }
    for l in &p.leds {
        let _ = write!(out, "\n  {}", led_line(l));
    }
    out
}

// ── Leaf entities ───────────────────────────────────────────────────

pub fn dpi(r: &Resolution) -> String {
    if r.is_split() {
        format!("{}x{}dpi", r.xres, r.yres)
    } else {
        format!("{}dpi", r.xres)
    }
}

pub fn resolution_line(r: &Resolution) -> String {
    let mut out = format!("{}: {}", r.index, dpi(r));
    for (set, tag) in [
        (r.is_active, " (active)"),
        (r.is_default, " (default)"),
        (r.is_disabled, " (disabled)"),
    ] {
        if set {
            out.push_str(tag);
        }
    }
    out
}

pub fn button_line(b: &Button) -> String {
    format!("Button: {} is mapped to {}", b.index, b.action)
}

/// Effect fields are shown only for modes that use them.
pub fn led_line(l: &Led) -> String {
    let mut out = format!(
        "LED: {}, depth: {}, mode: {}",
        l.index, l.color_depth, l.mode
    );
    if l.mode.shows_effect() {
        let _ = write!(out, ", duration: {}, brightness: {}", l.duration, l.brightness);
    }
    if l.mode.shows_color() {
        let _ = write!(out, ", color: {}", l.color);
    }
    out
}

pub fn led_modes(l: &Led) -> String {
    let mut modes = l.modes.iter().map(ToString::to_string).collect::<Vec<_>>();
    modes.sort_unstable();
    format!("Modes: {}", modes.join(", "))
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::action::{Action, ActionKind, SpecialAction};
    use crate::model::{Color, ColorDepth, LedMode, LedType, ProfileCapability, ResolutionCapability};

    fn resolution(index: usize, x: u32, y: u32) -> Resolution {
        Resolution {
            index,
            xres: x,
            yres: y,
            is_active: false,
            is_default: false,
            is_disabled: false,
            capabilities: BTreeSet::new(),
            dpi_min: 100,
            dpi_max: 8000,
            dpi_list: vec![400, 800, 1600],
        }
    }

    fn led(mode: LedMode) -> Led {
        Led {
            index: 0,
            led_type: LedType::Logo,
            color_depth: ColorDepth::Rgb,
            mode,
            modes: LedMode::all(),
            color: Color::from_rgb(0xff, 0, 0),
            duration: 1000,
            brightness: 20,
        }
    }

    fn profile() -> Profile {
        let mut split = resolution(1, 1200, 1300);
        split.is_active = true;
        split.is_default = true;
        split.capabilities.insert(ResolutionCapability::SeparateXy);
        Profile {
            index: 0,
            name: String::new(),
            capabilities: BTreeSet::from([ProfileCapability::WritableName]),
            is_active: true,
            is_disabled: false,
            report_rate: 1000,
            report_rates: vec![125, 500, 1000],
            resolutions: vec![resolution(0, 800, 800), split],
            buttons: vec![Button {
                index: 0,
                action: Action::Special {
                    name: SpecialAction::ProfileCycleUp,
                },
                action_types: ActionKind::all(),
            }],
            leds: vec![led(LedMode::On)],
        }
    }

    #[test]
    fn dpi_splits_on_capability_or_mismatch() {
        let mut r = resolution(0, 800, 800);
        assert_eq!(dpi(&r), "800dpi");
        r.capabilities.insert(ResolutionCapability::SeparateXy);
        assert_eq!(dpi(&r), "800x800dpi");
        let r = resolution(0, 800, 900);
        assert_eq!(dpi(&r), "800x900dpi");
    }

    #[test]
    fn resolution_line_tags() {
        let mut r = resolution(2, 400, 400);
        r.is_default = true;
        r.is_disabled = true;
        assert_eq!(resolution_line(&r), "2: 400dpi (default) (disabled)");
    }

    #[test]
    fn led_line_per_mode() {
        assert_eq!(led_line(&led(LedMode::Off)), "LED: 0, depth: rgb, mode: off");
        assert_eq!(
            led_line(&led(LedMode::On)),
            "LED: 0, depth: rgb, mode: on, color: ff0000"
        );
        assert_eq!(
            led_line(&led(LedMode::Cycle)),
            "LED: 0, depth: rgb, mode: cycle, duration: 1000, brightness: 20"
        );
        assert_eq!(
            led_line(&led(LedMode::Breathing)),
            "LED: 0, depth: rgb, mode: breathing, duration: 1000, brightness: 20, color: ff0000"
        );
    }

    #[test]
    fn led_modes_are_sorted() {
        let mut l = led(LedMode::On);
        l.modes = BTreeSet::from([LedMode::Cycle, LedMode::Off, LedMode::On]);
        assert_eq!(led_modes(&l), "Modes: cycle, off, on");
    }

    #[test]
    fn list_pads_id_column() {
        let d = Device {
            id: "mouse".into(),
            name: "Test Mouse".into(),
            model: String::new(),
            firmware_version: String::new(),
            profiles: Vec::new(),
        };
        assert_eq!(device_list([&d]), "mouse:               Test Mouse");
        assert_eq!(device_list(std::iter::empty()), "");
    }

    #[test]
    fn profile_block_layout() {
        assert_snapshot!(profile_block(&profile()), @r"
        Profile 0: (active)
          Name: n/a
          Report Rate: 1000Hz
          Resolutions:
            0: 800dpi
            1: 1200x1300dpi (active) (default)
          Button: 0 is mapped to 'profile-cycle-up'
          LED: 0, depth: rgb, mode: on, color: ff0000
        ");
    }

    #[test]
    fn scalar_queries() {
        let d = Device {
            id: "mouse".into(),
            name: "Test Mouse".into(),
            model: "usb:046d:c080".into(),
            firmware_version: "1.2".into(),
            profiles: vec![profile()],
        };
        let at = Node::Profile { profile: 0 };
        assert_eq!(render(&d, at, Query::RateAll).unwrap(), "125 500 1000");
        assert_eq!(render(&d, at, Query::ActiveResolution).unwrap(), "1");
        assert_eq!(render(&d, at, Query::ButtonCount).unwrap(), "1");
        assert_eq!(render(&d, Node::Device, Query::ActiveProfile).unwrap(), "0");
        let res = Node::Resolution {
            profile: 0,
            resolution: 0,
        };
        assert_eq!(render(&d, res, Query::ResolutionEnabled).unwrap(), "true");
        assert_eq!(render(&d, res, Query::DpiAll).unwrap(), "400 800 1600");
        assert!(render(&d, res, Query::Rate).is_err());
    }
}
