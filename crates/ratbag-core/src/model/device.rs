// ── Device domain type ──

use serde::{Deserialize, Serialize};

use super::{EntityKind, Led, Profile, lookup, lookup_mut};
use crate::command::Mutation;
use crate::error::CoreError;

/// Root of the model tree: one physical device and its profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub firmware_version: String,
    pub profiles: Vec<Profile>,
}

impl Device {
    pub fn profile(&self, index: usize) -> Result<&Profile, CoreError> {
        lookup(&self.profiles, EntityKind::Profile, index)
    }

    fn profile_mut(&mut self, index: usize) -> Result<&mut Profile, CoreError> {
        lookup_mut(&mut self.profiles, EntityKind::Profile, index)
    }

    pub fn active_profile(&self) -> Option<usize> {
        self.profiles.iter().position(|p| p.is_active)
    }

    /// Assign every entity its position as index.
    pub fn reindex(&mut self) {
        for (i, p) in self.profiles.iter_mut().enumerate() {
            p.index = i;
            p.reindex();
        }
    }

    /// Describe the first uniqueness invariant the tree violates, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        if self.profiles.iter().filter(|p| p.is_active).count() > 1 {
            return Some(format!("device '{}' has more than one active profile", self.id));
        }
        for p in &self.profiles {
            if p.resolutions.iter().filter(|r| r.is_active).count() > 1 {
                return Some(format!("profile {} has more than one active resolution", p.index));
            }
            if p.resolutions.iter().filter(|r| r.is_default).count() > 1 {
                return Some(format!("profile {} has more than one default resolution", p.index));
            }
        }
        None
    }

    /// Apply a validated mutation as a single transition.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), CoreError> {
        match mutation {
            Mutation::SetActiveProfile { profile } => {
                self.profile(*profile)?;
                for (i, p) in self.profiles.iter_mut().enumerate() {
                    p.is_active = i == *profile;
                }
            }
            Mutation::SetProfileName { profile, name } => {
                self.profile_mut(*profile)?.name.clone_from(name);
            }
            Mutation::SetProfileDisabled { profile, disabled } => {
                self.profile_mut(*profile)?.is_disabled = *disabled;
            }
            Mutation::SetReportRate { profile, rate } => {
                self.profile_mut(*profile)?.report_rate = *rate;
            }
            Mutation::SetActiveResolution {
                profile,
                resolution,
            } => self.profile_mut(*profile)?.set_active_resolution(*resolution)?,
            Mutation::SetDefaultResolution {
                profile,
                resolution,
            } => self.profile_mut(*profile)?.set_default_resolution(*resolution)?,
            Mutation::SetResolutionDisabled {
                profile,
                resolution,
                disabled,
            } => {
                self.profile_mut(*profile)?
                    .resolution_mut(*resolution)?
                    .is_disabled = *disabled;
            }
            Mutation::SetResolutionDpi {
                profile,
                resolution,
                xres,
                yres,
            } => {
                let r = self.profile_mut(*profile)?.resolution_mut(*resolution)?;
                r.xres = *xres;
                r.yres = *yres;
            }
            Mutation::SetButtonAction {
                profile,
                button,
                action,
            } => {
                self.profile_mut(*profile)?.button_mut(*button)?.action = action.clone();
            }
            Mutation::SetLed {
                profile,
                led,
                mode,
                color,
                duration,
                brightness,
            } => {
                let l: &mut Led = self.profile_mut(*profile)?.led_mut(*led)?;
                l.mode = *mode;
                l.color = *color;
                l.duration = *duration;
                l.brightness = *brightness;
            }
        }
        Ok(())
    }
}
