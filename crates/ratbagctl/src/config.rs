//! CLI-side configuration: which config file to read and where the device
//! state lives once `--state-file` is taken into account.

use std::path::PathBuf;

use ratbag_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config named by `--config`, or the platform default.
///
/// An explicit path must exist; the default path is optional.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    match &global.config {
        Some(path) if !path.is_file() => Err(CliError::NoConfig {
            path: path.display().to_string(),
        }),
        Some(path) => Ok(ratbag_config::load_config_from(path)?),
        None => Ok(ratbag_config::load_config()?),
    }
}

/// `--state-file` beats the config file, which beats the platform default.
pub fn state_file(global: &GlobalOpts, cfg: &Config) -> PathBuf {
    global
        .state_file
        .clone()
        .unwrap_or_else(|| cfg.state_file())
}
