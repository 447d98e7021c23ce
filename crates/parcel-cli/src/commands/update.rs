//! `parcel update` command implementation.
//!
//! For each requested package, picks the best remote version satisfying
//! the constraint, downloads the archive and extracts it under
//! `packages/<name>`. One failing package does not stop the rest.

use parcel_archive::extract_tar_gz;
use parcel_config::{InstallManifest, PackageRequest, RemoteConfig};
use parcel_core::error::{ParcelError, ParcelResult};
use parcel_resolver::select_best_version;
use parcel_transport::{Remote, SftpRemote};
use std::path::Path;
use tracing::warn;

use super::{join_remote, CommandContext};

/// Execute the `parcel update` command
pub fn execute(manifest_path: &Path, config_path: &Path, ctx: &CommandContext) -> ParcelResult<()> {
    let manifest = InstallManifest::load(manifest_path)?;
    let config = RemoteConfig::load_or_default(config_path)?;

    let remote = SftpRemote::connect(&config)?;
    let remote_dir = remote.remote_dir().to_string();

    run(&manifest, &remote, &remote_dir, ctx)
}

/// Install every package in the manifest, best effort
pub fn run(
    manifest: &InstallManifest,
    remote: &dyn Remote,
    remote_dir: &str,
    ctx: &CommandContext,
) -> ParcelResult<()> {
    ctx.output.step(
        "🔄",
        &format!("Updating {} package(s)", manifest.packages.len()),
    );

    for request in &manifest.packages {
        ctx.output
            .info(&format!("Processing package: {}", request.name));

        match install_package(request, remote, remote_dir, ctx) {
            Ok(()) => {
                ctx.output
                    .success(&format!("Package {} installed successfully", request.name));
            },
            Err(e) => {
                warn!("Failed to install package {}: {}", request.name, e);
                ctx.output
                    .warn(&format!("Failed to install package {}: {}", request.name, e));
            },
        }
    }

    ctx.output.success("Package update completed");
    Ok(())
}

/// Download and extract a single package
fn install_package(
    request: &PackageRequest,
    remote: &dyn Remote,
    remote_dir: &str,
    ctx: &CommandContext,
) -> ParcelResult<()> {
    let files = remote.list_files(remote_dir)?;
    let archive_name = select_best_version(&files, &request.name, request.constraint())?;

    let temp_dir = tempfile::tempdir()
        .map_err(|e| ParcelError::io("Failed to create temp directory", e))?;
    let local_archive = temp_dir.path().join(&archive_name);

    ctx.output
        .step("📥", &format!("Downloading {}...", archive_name));
    remote.download(&join_remote(remote_dir, &archive_name), &local_archive)?;

    let install_dir = ctx.cwd.join("packages").join(&request.name);

    ctx.output.step(
        "📂",
        &format!("Extracting {} to {}...", archive_name, install_dir.display()),
    );
    extract_tar_gz(&local_archive, &install_dir)?;

    Ok(())
}
