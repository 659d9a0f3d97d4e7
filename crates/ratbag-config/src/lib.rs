//! Configuration for ratbagctl.
//!
//! A TOML file in the platform config directory, layered over built-in
//! defaults and overridden by `RATBAGCTL_*` environment variables
//! (`__` separates nested keys, e.g. `RATBAGCTL_LOGGING__LEVEL`).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "RATBAGCTL_";

/// File name of the device state inside the data directory.
pub const STATE_FILE_NAME: &str = "devices.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Device state file used by the file-backed service.
    pub state_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Logging {
    /// `EnvFilter` directive used when neither `-v` nor `RUST_LOG` is set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable logs.
    #[serde(default)]
    pub json: bool,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "warn".into()
}

impl Config {
    /// The configured state file, or the platform default.
    pub fn state_file(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(default_state_file)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self
            .state_file
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation {
                field: "state_file".into(),
                reason: "path is empty".into(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "logging.level".into(),
                reason: "filter directive is empty".into(),
            });
        }
        Ok(self)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "libratbag", "ratbagctl")
}

fn home_fallback(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.extend(parts);
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".config", "ratbagctl", "config.toml"]),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default device state file in the platform data directory.
pub fn default_state_file() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(&[".local", "share", "ratbagctl", STATE_FILE_NAME]),
        |dirs| dirs.data_dir().join(STATE_FILE_NAME),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.logging.level, "warn");
        assert!(!cfg.logging.json);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "state_file = \"/var/lib/ratbag/devices.json\"\n\n[logging]\njson = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.state_file(), PathBuf::from("/var/lib/ratbag/devices.json"));
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn empty_state_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "state_file = \"\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "state_file"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn default_state_file_name() {
        assert!(default_state_file().ends_with(STATE_FILE_NAME));
        assert!(config_path().ends_with("config.toml"));
    }
}
