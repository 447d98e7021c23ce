//! # parcel-cli
//!
//! Command-line package manager that packs local files into tar.gz
//! archives, publishes them to a remote host over SFTP and installs the
//! best version matching a constraint.
//!
//! This is the main entry point. It handles command parsing, sets up
//! logging and error handling, and dispatches to the command handlers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

mod commands;
mod output;

use output::errors::ErrorFormatter;

/// Package manager for tar.gz packets published over SFTP
#[derive(Parser)]
#[command(name = "parcel", version, about = "Packs, publishes and installs packages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a package from a packet manifest and upload it
    Create {
        /// Packet manifest (JSON or TOML)
        manifest: PathBuf,
        /// Remote configuration file path
        #[arg(short = 'c', long, default_value = "ssh-config.json")]
        config: PathBuf,
    },
    /// Download and install the packages listed in an install manifest
    Update {
        /// Install manifest (JSON or TOML)
        manifest: PathBuf,
        /// Remote configuration file path
        #[arg(short = 'c', long, default_value = "ssh-config.json")]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> parcel_core::ParcelResult<()> {
    let ctx = commands::CommandContext::new()?;
    commands::dispatch_command(cli.command, &ctx)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "parcel_cli={level},parcel_core={level},parcel_archive={level},parcel_resolver={level},parcel_transport={level}"
        ))
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Parcel encountered an unexpected error: {}", panic_info);
        eprintln!("Parcel crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/parcel-pm/parcel/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
