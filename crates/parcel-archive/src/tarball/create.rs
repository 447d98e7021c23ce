//! Tar.gz archive creation.
//!
//! Builds a compressed archive from a collected file set, naming each
//! entry by its path relative to the current working directory so the
//! directory structure survives the round trip.

use flate2::write::GzEncoder;
use flate2::Compression;
use parcel_core::error::ParcelError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::Builder;

use tracing::debug;

use crate::pattern::collect_files_with_exclude;
use crate::ArchiveResult;

/// Create a tar.gz archive from files matching the given patterns.
///
/// Include patterns are pooled and expanded first; exclude patterns
/// filter the result by base name. Matching nothing at all is a
/// configuration error, not an empty archive.
pub fn create_tar_gz(
    include: &[String],
    exclude: &[String],
    output_path: &Path,
) -> ArchiveResult<()> {
    let files = collect_files_with_exclude(include, exclude)?;
    if files.is_empty() {
        return Err(ParcelError::NoFilesMatched {
            patterns: include.to_vec(),
        });
    }

    archive_files(&files, output_path)
}

/// Write the given files into a gzip-compressed tar archive.
pub fn archive_files(files: &[PathBuf], output_path: &Path) -> ArchiveResult<()> {
    if files.is_empty() {
        return Err(ParcelError::NoFilesMatched {
            patterns: Vec::new(),
        });
    }

    let out_file = File::create(output_path).map_err(|e| {
        ParcelError::io(
            format!("Failed to create archive {}", output_path.display()),
            e,
        )
    })?;

    debug!(
        files = files.len(),
        output = %output_path.display(),
        "writing archive"
    );

    let gz_encoder = GzEncoder::new(out_file, Compression::default());
    let mut tar_builder = Builder::new(gz_encoder);

    let cwd = std::env::current_dir().ok();

    for file in files {
        let entry_name = archive_entry_name(cwd.as_deref(), file);
        tar_builder
            .append_path_with_name(file, &entry_name)
            .map_err(|e| {
                ParcelError::io(format!("Failed to add {} to archive", file.display()), e)
            })?;
    }

    let gz_encoder = tar_builder
        .into_inner()
        .map_err(|e| ParcelError::io("Failed to finish archive", e))?;
    gz_encoder
        .finish()
        .map_err(|e| ParcelError::io("Failed to finish compression", e))?;

    Ok(())
}

/// Compute the name a file is stored under inside the archive.
///
/// The name is the slash-separated path relative to the working
/// directory. When that is unrepresentable (file outside the working
/// tree, unknown working directory) or would encode an escape from the
/// archive root, the bare file name is used instead.
fn archive_entry_name(cwd: Option<&Path>, file: &Path) -> String {
    let fallback = || {
        file.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let cwd = match cwd {
        Some(cwd) => cwd,
        None => return fallback(),
    };

    let relative = match pathdiff::diff_paths(file, cwd) {
        Some(relative) => relative,
        None => return fallback(),
    };

    if relative.as_os_str().is_empty() || relative == Path::new(".") {
        return fallback();
    }
    if relative.starts_with("..") {
        return fallback();
    }

    let name = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if name.is_empty() {
        fallback()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tarball::extract::extract_tar_gz;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_entry_name_relative_to_cwd() {
        let cwd = Path::new("/work/project");
        let name = archive_entry_name(Some(cwd), Path::new("/work/project/src/main.rs"));
        assert_eq!(name, "src/main.rs");
    }

    #[test]
    fn test_entry_name_falls_back_outside_cwd() {
        let cwd = Path::new("/work/project");
        let name = archive_entry_name(Some(cwd), Path::new("/elsewhere/lib.rs"));
        assert_eq!(name, "lib.rs");
    }

    #[test]
    fn test_entry_name_falls_back_without_cwd() {
        let name = archive_entry_name(None, Path::new("/work/project/src/main.rs"));
        assert_eq!(name, "main.rs");
    }

    #[test]
    fn test_create_fails_on_no_matches() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.tar.gz");

        let include = vec![format!("{}/*.nonexistent", dir.path().display())];
        let result = create_tar_gz(&include, &[], &out);

        assert!(matches!(result, Err(ParcelError::NoFilesMatched { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_archive_files_rejects_empty_set() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.tar.gz");
        let result = archive_files(&[], &out);
        assert!(matches!(result, Err(ParcelError::NoFilesMatched { .. })));
    }

    #[test]
    fn test_create_and_extract_flat_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "first").unwrap();
        fs::write(dir.path().join("two.txt"), "second").unwrap();

        let out = dir.path().join("pkg.tar.gz");
        let include = vec![format!("{}/*.txt", dir.path().display())];
        create_tar_gz(&include, &[], &out).unwrap();

        // The files live outside the working directory, so they are
        // stored under their base names.
        let extract_dir = dir.path().join("extracted");
        extract_tar_gz(&out, &extract_dir).unwrap();

        assert_eq!(
            fs::read_to_string(extract_dir.join("one.txt")).unwrap(),
            "first"
        );
        assert_eq!(
            fs::read_to_string(extract_dir.join("two.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_round_trip_preserves_relative_paths() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src/sub")).unwrap();
        fs::write(root.join("src/a.txt"), "alpha").unwrap();
        fs::write(root.join("src/sub/b.txt"), "beta").unwrap();

        let out = root.join("pkg.tar.gz");
        let files = vec![root.join("src/a.txt"), root.join("src/sub/b.txt")];

        // Build from inside the tree so entries get relative names
        let old_cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(&root).unwrap();
        let result = archive_files(&files, &out);
        std::env::set_current_dir(&old_cwd).unwrap();
        result.unwrap();

        let extract_dir = root.join("extracted");
        extract_tar_gz(&out, &extract_dir).unwrap();

        assert_eq!(
            fs::read_to_string(extract_dir.join("src/a.txt")).unwrap(),
            "alpha"
        );
        assert_eq!(
            fs::read_to_string(extract_dir.join("src/sub/b.txt")).unwrap(),
            "beta"
        );
    }

    #[test]
    fn test_exclude_applies_to_archive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("keep.go"), "package keep").unwrap();
        fs::write(dir.path().join("skip.tmp"), "scratch").unwrap();

        let out = dir.path().join("pkg.tar.gz");
        let include = vec![format!("{}/*", dir.path().display())];
        create_tar_gz(&include, &["*.tmp".to_string()], &out).unwrap();

        let extract_dir = dir.path().join("extracted");
        extract_tar_gz(&out, &extract_dir).unwrap();

        assert!(extract_dir.join("keep.go").exists());
        assert!(!extract_dir.join("skip.tmp").exists());
    }
}
