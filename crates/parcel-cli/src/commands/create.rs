//! `parcel create` command implementation.
//!
//! Builds a tar.gz archive from the packet manifest's targets and
//! uploads it to the remote package directory as
//! `<name>-<version>.tar.gz`.

use parcel_archive::create_tar_gz;
use parcel_config::{PacketManifest, RemoteConfig};
use parcel_core::error::{ParcelError, ParcelResult};
use parcel_transport::{Remote, SftpRemote};
use std::path::Path;
use tracing::debug;

use super::{join_remote, CommandContext};

/// Execute the `parcel create` command
pub fn execute(manifest_path: &Path, config_path: &Path, ctx: &CommandContext) -> ParcelResult<()> {
    let manifest = PacketManifest::load(manifest_path)?;
    let config = RemoteConfig::load_or_default(config_path)?;

    let remote = SftpRemote::connect(&config)?;
    let remote_dir = remote.remote_dir().to_string();

    run(&manifest, &remote, &remote_dir, ctx)
}

/// Build and upload the package described by the manifest
pub fn run(
    manifest: &PacketManifest,
    remote: &dyn Remote,
    remote_dir: &str,
    ctx: &CommandContext,
) -> ParcelResult<()> {
    ctx.output.step(
        "📦",
        &format!(
            "Creating package: {} (version {})",
            manifest.name, manifest.version
        ),
    );

    let (include, exclude) = manifest.pooled_patterns();
    if include.is_empty() {
        return Err(ParcelError::ConfigValidation {
            field: "targets".to_string(),
            reason: "no targets specified in configuration".to_string(),
        });
    }

    debug!(?include, ?exclude, "pooled target patterns");

    let temp_dir = tempfile::tempdir()
        .map_err(|e| ParcelError::io("Failed to create temp directory", e))?;

    let archive_name = format!("{}-{}.tar.gz", manifest.name, manifest.version);
    let archive_path = temp_dir.path().join(&archive_name);

    ctx.output
        .info(&format!("Creating archive: {}", archive_name));
    create_tar_gz(&include, &exclude, &archive_path)?;

    remote.ensure_dir(remote_dir)?;

    let remote_path = join_remote(remote_dir, &archive_name);
    ctx.output
        .step("📤", &format!("Uploading to {}...", remote_path));
    remote.upload(&archive_path, &remote_path)?;

    ctx.output.success(&format!(
        "Package {} successfully created and uploaded",
        manifest.name
    ));

    Ok(())
}
