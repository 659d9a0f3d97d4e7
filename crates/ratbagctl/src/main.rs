mod cli;
mod config;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ratbag_config::Logging;
use ratbag_core::{FixtureService, Session};

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(global: &GlobalOpts, logging: &Logging) {
    let filter = match (global.verbose, global.quiet) {
        (0, true) => "error",
        (0, false) => logging.level.as_str(),
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let cfg = config::load(&cli.global)?;
    init_tracing(&cli.global, &cfg.logging);

    let path = config::state_file(&cli.global, &cfg);
    tracing::debug!(path = %path.display(), "opening device state");
    let service = FixtureService::open(&path)
        .await
        .map_err(|e| CliError::from(ratbag_core::CoreError::from(e)))?;
    let session = Session::load(service).await?;

    let device = cli.command.first().map_or("<device>", String::as_str);
    let output = session
        .execute(&cli.command)
        .await
        .map_err(|e| CliError::from_core(e, device))?;

    if !cli.global.quiet && !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
