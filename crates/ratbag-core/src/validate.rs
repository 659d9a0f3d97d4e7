// ── Validation and capability layer ──
//
// Checks a parsed change against the addressed node's capabilities and
// declared bounds, then produces the `Mutation` to apply. Nothing here
// writes: a rejected change leaves the model exactly as it was.

use crate::action::Action;
use crate::command::Mutation;
use crate::error::CoreError;
use crate::grammar::{ActionRequest, Change, DpiValue, LedPatch};
use crate::model::led::MAX_DURATION_MS;
use crate::model::{
    ColorDepth, Device, EntityKind, Led, Node, Profile, ProfileCapability, Resolution,
    ResolutionCapability, checked_index,
};

/// Validate `change` against `node` and build the mutation it implies.
pub fn plan(device: &Device, node: Node, change: &Change) -> Result<Mutation, CoreError> {
    match (node, change) {
        (Node::Device, Change::ActiveProfile(index)) => active_profile(device, *index),
        (Node::Profile { profile }, change) => profile_change(device.profile(profile)?, change),
        (Node::Resolution { profile, resolution }, change) => {
            let p = device.profile(profile)?;
            resolution_change(p, p.resolution(resolution)?, change)
        }
        (Node::Button { profile, button }, Change::ButtonAction(request)) => {
            let b = device.profile(profile)?.button(button)?;
            if !b.accepts(request.kind()) {
                return Err(CoreError::capability(
                    format!("map button {button} to a {} action", request.kind()),
                    format!("button {button} does not support {} actions", request.kind()),
                ));
            }
            Ok(Mutation::SetButtonAction {
                profile,
                button,
                action: action(request)?,
            })
        }
        (Node::Led { profile, led }, Change::Led(patches)) => {
            let next = patch_led(device.profile(profile)?.led(led)?, patches)?;
            Ok(Mutation::SetLed {
                profile,
                led,
                mode: next.mode,
                color: next.color,
                duration: next.duration,
                brightness: next.brightness,
            })
        }
        (node, change) => Err(mismatch(node, change)),
    }
}

fn mismatch(node: Node, change: &Change) -> CoreError {
    CoreError::UnknownCommand {
        token: format!("{change:?}"),
        context: node.kind().to_string(),
    }
}

// ── Profile ─────────────────────────────────────────────────────────

fn active_profile(device: &Device, index: i64) -> Result<Mutation, CoreError> {
    let profile = checked_index(EntityKind::Profile, index, device.profiles.len())?;
    if device.profile(profile)?.is_disabled {
        return Err(CoreError::capability(
            format!("activate profile {profile}"),
            "the profile is disabled",
        ));
    }
    Ok(Mutation::SetActiveProfile { profile })
}

fn profile_change(p: &Profile, change: &Change) -> Result<Mutation, CoreError> {
    let profile = p.index;
    match change {
        Change::ProfileName(name) => {
            if !p.has(ProfileCapability::WritableName) {
                return Err(CoreError::capability(
                    format!("rename profile {profile}"),
                    "the profile name is read-only",
                ));
            }
            Ok(Mutation::SetProfileName {
                profile,
                name: name.clone(),
            })
        }
        Change::ProfileEnabled(enabled) => {
            let verb = if *enabled { "enable" } else { "disable" };
            if !p.has(ProfileCapability::Disable) {
                return Err(CoreError::capability(
                    format!("{verb} profile {profile}"),
                    "the device cannot disable profiles",
                ));
            }
            if !enabled && p.is_active {
                return Err(CoreError::capability(
                    format!("disable profile {profile}"),
                    "the profile is active",
                ));
            }
            Ok(Mutation::SetProfileDisabled {
                profile,
                disabled: !enabled,
            })
        }
        Change::Rate(rate) => {
            if p.report_rates.is_empty() {
                return Err(CoreError::capability(
                    format!("set the report rate of profile {profile}"),
                    "the device declares no report rates",
                ));
            }
            let rate = u32::try_from(*rate)
                .ok()
                .filter(|r| p.report_rates.contains(r))
                .ok_or_else(|| CoreError::Range {
                    field: "report rate",
                    value: *rate,
                    reason: format!("supported rates are {}", join(&p.report_rates)),
                })?;
            Ok(Mutation::SetReportRate { profile, rate })
        }
        Change::ActiveResolution(index) => {
            let resolution = selectable_resolution(p, *index, "activate")?;
            Ok(Mutation::SetActiveResolution {
                profile,
                resolution,
            })
        }
        Change::DefaultResolution(index) => {
            let resolution = selectable_resolution(p, *index, "make default")?;
            Ok(Mutation::SetDefaultResolution {
                profile,
                resolution,
            })
        }
        other => Err(mismatch(Node::Profile { profile }, other)),
    }
}

fn selectable_resolution(p: &Profile, index: i64, verb: &str) -> Result<usize, CoreError> {
    let resolution = checked_index(EntityKind::Resolution, index, p.resolutions.len())?;
    if p.resolution(resolution)?.is_disabled {
        return Err(CoreError::capability(
            format!("{verb} resolution {resolution}"),
            "the resolution is disabled",
        ));
    }
    Ok(resolution)
}

// ── Resolution ──────────────────────────────────────────────────────

fn resolution_change(p: &Profile, r: &Resolution, change: &Change) -> Result<Mutation, CoreError> {
    let (profile, resolution) = (p.index, r.index);
    match change {
        Change::ResolutionEnabled(enabled) => {
            let verb = if *enabled { "enable" } else { "disable" };
            if !r.has(ResolutionCapability::Disable) {
                return Err(CoreError::capability(
                    format!("{verb} resolution {resolution}"),
                    "the resolution cannot be disabled",
                ));
            }
            if !enabled && (r.is_active || r.is_default) {
                return Err(CoreError::capability(
                    format!("disable resolution {resolution}"),
                    "the resolution is active or default",
                ));
            }
            Ok(Mutation::SetResolutionDisabled {
                profile,
                resolution,
                disabled: !enabled,
            })
        }
        Change::Dpi(value) => {
            if r.is_disabled {
                return Err(CoreError::capability(
                    format!("set the dpi of resolution {resolution}"),
                    "the resolution is disabled",
                ));
            }
            let (xres, yres) = dpi(r, *value)?;
            Ok(Mutation::SetResolutionDpi {
                profile,
                resolution,
                xres,
                yres,
            })
        }
        other => Err(mismatch(
            Node::Resolution {
                profile,
                resolution,
            },
            other,
        )),
    }
}

fn dpi(r: &Resolution, value: DpiValue) -> Result<(u32, u32), CoreError> {
    match value {
        DpiValue::Single(raw) => {
            let dpi = dpi_in_bounds(r, raw)?;
            if !r.dpi_list.is_empty() && !r.dpi_list.contains(&dpi) {
                return Err(CoreError::Range {
                    field: "dpi",
                    value: raw,
                    reason: format!("supported values are {}", join(&r.dpi_list)),
                });
            }
            Ok((dpi, dpi))
        }
        DpiValue::Pair(x, y) => {
            let (xres, yres) = (dpi_in_bounds(r, x)?, dpi_in_bounds(r, y)?);
            if xres != yres && !r.has(ResolutionCapability::SeparateXy) {
                return Err(CoreError::capability(
                    format!("set {xres}x{yres}dpi on resolution {}", r.index),
                    "the resolution does not support separate x and y values",
                ));
            }
            Ok((xres, yres))
        }
    }
}

fn dpi_in_bounds(r: &Resolution, raw: i64) -> Result<u32, CoreError> {
    u32::try_from(raw)
        .ok()
        .filter(|dpi| (r.dpi_min..=r.dpi_max).contains(dpi))
        .ok_or_else(|| CoreError::Range {
            field: "dpi",
            value: raw,
            reason: format!("must be within {}..={}", r.dpi_min, r.dpi_max),
        })
}

// ── Button ──────────────────────────────────────────────────────────

fn action(request: &ActionRequest) -> Result<Action, CoreError> {
    Ok(match request {
        ActionRequest::None => Action::None,
        ActionRequest::Button(raw) => {
            let target = u32::try_from(*raw)
                .ok()
                .filter(|t| *t >= 1)
                .ok_or_else(|| CoreError::Range {
                    field: "button number",
                    value: *raw,
                    reason: "button numbers start at 1".into(),
                })?;
            Action::Button { target }
        }
        ActionRequest::Special(name) => Action::Special { name: *name },
        ActionRequest::Macro(events) => Action::Macro {
            events: events.clone(),
        },
    })
}

// ── LED ─────────────────────────────────────────────────────────────

/// Apply patches left to right to a copy of `led`.
fn patch_led(led: &Led, patches: &[LedPatch]) -> Result<Led, CoreError> {
    let mut next = led.clone();
    for patch in patches {
        match *patch {
            LedPatch::Mode(mode) => {
                if !led.modes.contains(&mode) {
                    return Err(CoreError::capability(
                        format!("set LED {} to {mode}", led.index),
                        "the LED does not support this mode",
                    ));
                }
                next.mode = mode;
            }
            LedPatch::Duration(raw) => {
                next.duration = u32::try_from(raw)
                    .ok()
                    .filter(|d| *d <= MAX_DURATION_MS)
                    .ok_or_else(|| CoreError::Range {
                        field: "duration",
                        value: raw,
                        reason: format!("must be within 0..={MAX_DURATION_MS} ms"),
                    })?;
            }
            LedPatch::Brightness(raw) => {
                next.brightness = u8::try_from(raw).map_err(|_| CoreError::Range {
                    field: "brightness",
                    value: raw,
                    reason: "must be within 0..=255".into(),
                })?;
            }
            LedPatch::Color(color) => {
                if led.color_depth == ColorDepth::Monochrome {
                    return Err(CoreError::capability(
                        format!("set the color of LED {}", led.index),
                        "the LED is monochrome",
                    ));
                }
                next.color = color;
            }
        }
    }
    Ok(next)
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
