//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch
//! system. Each command loads its manifests, connects the remote and
//! hands off to a transport-agnostic runner so the flows stay testable.

use parcel_core::error::{ParcelError, ParcelResult};
use std::path::PathBuf;
use tracing::info;

pub mod create;
pub mod update;


use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a new command context
    pub fn new() -> ParcelResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ParcelError::io("Failed to get current directory", e))?;

        let output = OutputHandler::new();

        Ok(Self { cwd, output })
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> ParcelResult<()> {
    match command {
        Commands::Create { manifest, config } => {
            info!("Creating package from {}", manifest.display());
            create::execute(&manifest, &config, ctx)
        },
        Commands::Update { manifest, config } => {
            info!("Updating packages from {}", manifest.display());
            update::execute(&manifest, &config, ctx)
        },
        Commands::Version => {
            show_version(ctx);
            Ok(())
        },
    }
}

/// Join a remote directory and a file name with a forward slash
pub fn join_remote(remote_dir: &str, name: &str) -> String {
    format!("{}/{}", remote_dir.trim_end_matches('/'), name)
}

fn show_version(ctx: &CommandContext) {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.info(&format!("parcel v{}", version));
    ctx.output.info(&format!("Built: {}", build_date));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));
}
