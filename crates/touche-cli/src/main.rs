//! # touche CLI entry point
//!
//! Parses command-line arguments, installs logging, and dispatches to the
//! subcommand handlers in `touche_cli`.

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use touche_cli::context::{CliContext, DATA_DIR_ENV};
use touche_cli::descriptor::{run_descriptor, DescriptorArgs};
use touche_cli::identity::{run_identity, run_register, IdentityArgs, RegisterArgs};
use touche_cli::run::{run_scoreboard, RunArgs};
use touche_client::DEFAULT_TIMEOUT_SECS;

/// Fencing scoreboard with tournament result submission.
#[derive(Parser, Debug)]
#[command(name = "touche", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the device credential store.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// HTTP timeout for tournament requests, in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive scoreboard.
    Run(RunArgs),

    /// Register this device with a tournament system.
    Register(RegisterArgs),

    /// Show or clear the stored device credential.
    Identity(IdentityArgs),

    /// Validate a decoded QR match payload.
    Descriptor(DescriptorArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the scoreboard.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext::new(cli.data_dir, cli.timeout_secs);
    tracing::debug!(data_dir = %ctx.data_dir.display(), "touche CLI starting");

    let result = match cli.command {
        Commands::Run(args) => block_on(run_scoreboard(&args, &ctx)),
        Commands::Register(args) => block_on(run_register(&args, &ctx)),
        Commands::Identity(args) => run_identity(&args, &ctx),
        Commands::Descriptor(args) => run_descriptor(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn block_on<F: Future<Output = Result<u8>>>(future: F) -> Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(future)
}
