// ── Typed mutation requests ──
//
// Every state change a command can make, with fully validated arguments.
// The same value is applied to the local model and handed to the Device
// Service, so both sides run one transition.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::model::{Color, LedMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "method", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mutation {
    SetActiveProfile {
        profile: usize,
    },
    SetProfileName {
        profile: usize,
        name: String,
    },
    SetProfileDisabled {
        profile: usize,
        disabled: bool,
    },
    SetReportRate {
        profile: usize,
        rate: u32,
    },
    SetActiveResolution {
        profile: usize,
        resolution: usize,
    },
    SetDefaultResolution {
        profile: usize,
        resolution: usize,
    },
    SetResolutionDisabled {
        profile: usize,
        resolution: usize,
        disabled: bool,
    },
    SetResolutionDpi {
        profile: usize,
        resolution: usize,
        xres: u32,
        yres: u32,
    },
    SetButtonAction {
        profile: usize,
        button: usize,
        action: Action,
    },
    SetLed {
        profile: usize,
        led: usize,
        mode: LedMode,
        color: Color,
        duration: u32,
        brightness: u8,
    },
}

impl Mutation {
    /// Service method this mutation maps to.
    pub fn method_name(&self) -> &'static str {
        self.into()
    }

    pub fn profile(&self) -> Option<usize> {
        match self {
            Self::SetActiveProfile { .. } => None,
            Self::SetProfileName { profile, .. }
            | Self::SetProfileDisabled { profile, .. }
            | Self::SetReportRate { profile, .. }
            | Self::SetActiveResolution { profile, .. }
            | Self::SetDefaultResolution { profile, .. }
            | Self::SetResolutionDisabled { profile, .. }
            | Self::SetResolutionDpi { profile, .. }
            | Self::SetButtonAction { profile, .. }
            | Self::SetLed { profile, .. } => Some(*profile),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_snake_case() {
        let m = Mutation::SetResolutionDpi {
            profile: 0,
            resolution: 1,
            xres: 800,
            yres: 800,
        };
        assert_eq!(m.method_name(), "set_resolution_dpi");
        assert_eq!(m.profile(), Some(0));
        assert_eq!(Mutation::SetActiveProfile { profile: 2 }.profile(), None);
    }

    #[test]
    fn serializes_with_method_tag() {
        let m = Mutation::SetReportRate {
            profile: 1,
            rate: 500,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["method"], "set_report_rate");
        assert_eq!(json["rate"], 500);
    }
}
