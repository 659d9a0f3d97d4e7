//! Clap derive structures for the `ratbagctl` CLI.
//!
//! The device command itself is not modelled in clap: its depth depends on
//! the device, so it is collected as raw tokens and handed to the core
//! grammar resolver.

use std::path::PathBuf;

use clap::{Args, Parser};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ratbagctl -- inspect and configure gaming mice
#[derive(Debug, Parser)]
#[command(
    name = "ratbagctl",
    version,
    about = "Inspect and configure gaming mice",
    long_about = "Inspect and configure gaming mice managed by the ratbag device service.\n\n\
        Commands address a device, optionally narrowed to a profile and then a\n\
        resolution, button or LED:\n\n  \
        ratbagctl list\n  \
        ratbagctl <device> info\n  \
        ratbagctl <device> [profile N] [resolution N|button N|led N] <verb> [args...]\n\n\
        Without `profile N`, the active profile is used.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// `list`, or a device id followed by its command
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device state file (overrides the config file)
    #[arg(long, env = "RATBAGCTL_STATE_FILE", value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Config file to load instead of the platform default
    #[arg(long, env = "RATBAGCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}
