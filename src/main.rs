//! refup - tier-aware NuGet PackageReference updater
//!
//! Updates the package versions declared in .csproj, .vbproj and .fsproj
//! files, directly or through the .sln files that list them.

use clap::Parser;
use refup::cli::{normalize_legacy_args, CliArgs};
use refup::orchestrator::Orchestrator;
use refup::output::{create_reporter, OutputConfig};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse_from(normalize_legacy_args(std::env::args_os()));
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "refup=debug,warn" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;

    let color = args.use_color(io::stdout().is_terminal());
    colored::control::set_override(color);
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, color);

    let orchestrator = Orchestrator::new(args)?;
    let mut reporter = create_reporter(output_config, io::stdout());
    let result = orchestrator.run(reporter.as_mut()).await?;

    for error in &result.errors {
        tracing::debug!(error = %error, "run error");
    }

    Ok(ExitCode::from(result.exit_code()))
}
