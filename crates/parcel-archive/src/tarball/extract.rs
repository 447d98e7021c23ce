//! Tar.gz archive extraction.
//!
//! Streams the archive entry by entry, validating every target path
//! against the output directory before anything is written. Entry types
//! other than directories and regular files are skipped.

use flate2::read::GzDecoder;
use parcel_core::error::ParcelError;
use parcel_core::utils::path::join_within;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tar::{Archive, EntryType};
use tracing::debug;

use crate::ArchiveResult;

/// Extract a tar.gz archive into the given output directory.
///
/// Fails with `IllegalPath` on the first entry whose target would fall
/// outside the output directory. Any I/O failure aborts the whole
/// extraction; entries already written are left in place.
pub fn extract_tar_gz(archive_path: &Path, output_dir: &Path) -> ArchiveResult<()> {
    let file = File::open(archive_path).map_err(|e| {
        ParcelError::io(
            format!("Failed to open archive {}", archive_path.display()),
            e,
        )
    })?;

    debug!(
        archive = %archive_path.display(),
        output = %output_dir.display(),
        "extracting archive"
    );

    let gz_decoder = GzDecoder::new(file);
    let mut archive = Archive::new(gz_decoder);

    fs::create_dir_all(output_dir).map_err(|e| {
        ParcelError::io(
            format!("Failed to create output directory {}", output_dir.display()),
            e,
        )
    })?;

    let entries = archive
        .entries()
        .map_err(|e| ParcelError::io("Failed to read archive", e))?;

    for entry_result in entries {
        let mut entry =
            entry_result.map_err(|e| ParcelError::io("Failed to read archive entry", e))?;

        let entry_path = entry
            .path()
            .map_err(|e| ParcelError::io("Failed to read entry path", e))?
            .into_owned();

        // Checked for every entry, not just once per archive
        let target = join_within(output_dir, &entry_path).ok_or_else(|| {
            ParcelError::IllegalPath {
                path: entry_path.display().to_string(),
            }
        })?;

        let mode = entry.header().mode().ok();

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target).map_err(|e| {
                    ParcelError::io(format!("Failed to create directory {}", target.display()), e)
                })?;
                apply_mode(&target, mode);
            },
            EntryType::Regular => {
                extract_regular_file(&mut entry, &target)?;
                apply_mode(&target, mode);
            },
            _ => {
                // Symlinks, devices and the rest are not extracted
                continue;
            },
        }
    }

    Ok(())
}

/// Extract one regular-file entry to its validated target path.
fn extract_regular_file<R: Read>(entry: &mut tar::Entry<R>, target: &Path) -> ArchiveResult<()> {
    // Parent directories get a default mode, not the entry's
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ParcelError::io(
                format!("Failed to create parent directory {}", parent.display()),
                e,
            )
        })?;
    }

    let mut out_file = File::create(target)
        .map_err(|e| ParcelError::io(format!("Failed to create file {}", target.display()), e))?;

    std::io::copy(entry, &mut out_file)
        .map_err(|e| ParcelError::io(format!("Failed to write {}", target.display()), e))?;

    Ok(())
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
    }
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, Header};
    use tempfile::tempdir;

    /// Set an entry name even when it contains `..`, which `set_path`
    /// refuses; hostile archives are not built through `set_path`.
    fn set_entry_path(header: &mut Header, name: &str) {
        if header.set_path(name).is_ok() {
            return;
        }
        let bytes = name.as_bytes();
        header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
    }

    fn write_archive(path: &Path, entries: &[(&str, EntryType, &str)]) {
        let file = File::create(path).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(gz);

        for &(name, entry_type, content) in entries {
            let mut header = Header::new_gnu();
            header.set_entry_type(entry_type);
            set_entry_path(&mut header, name);
            if entry_type == EntryType::Directory {
                header.set_mode(0o755);
                header.set_size(0);
            } else {
                header.set_mode(0o644);
                header.set_size(content.len() as u64);
            }
            header.set_cksum();
            builder.append(&header, content.as_bytes()).unwrap();
        }

        let gz = builder.into_inner().unwrap();
        gz.finish().unwrap();
    }

    #[test]
    fn test_extract_simple_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("test.tar.gz");
        write_archive(
            &archive,
            &[("hello.txt", EntryType::Regular, "hello world")],
        );

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out).unwrap();

        assert_eq!(
            fs::read_to_string(out.join("hello.txt")).unwrap(),
            "hello world"
        );
    }

    #[test]
    fn test_extract_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("test.tar.gz");
        write_archive(
            &archive,
            &[("deep/nested/file.txt", EntryType::Regular, "content")],
        );

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out).unwrap();

        assert_eq!(
            fs::read_to_string(out.join("deep/nested/file.txt")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("evil.tar.gz");
        write_archive(&archive, &[("../evil.txt", EntryType::Regular, "escape")]);

        let out = dir.path().join("out");
        let result = extract_tar_gz(&archive, &out);

        assert!(matches!(result, Err(ParcelError::IllegalPath { .. })));
        // Nothing may be written outside the output directory
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_extract_rejects_nested_traversal() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("evil.tar.gz");
        write_archive(
            &archive,
            &[("safe/../../evil.txt", EntryType::Regular, "escape")],
        );

        let out = dir.path().join("out");
        let result = extract_tar_gz(&archive, &out);

        assert!(matches!(result, Err(ParcelError::IllegalPath { .. })));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_extract_skips_other_entry_types() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("mixed.tar.gz");

        let file = File::create(&archive).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(gz);

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Symlink);
        header.set_path("link").unwrap();
        header.set_link_name("target").unwrap();
        header.set_size(0);
        header.set_cksum();
        builder.append(&header, std::io::empty()).unwrap();

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_path("real.txt").unwrap();
        header.set_mode(0o644);
        header.set_size(4);
        header.set_cksum();
        builder.append(&header, "data".as_bytes()).unwrap();

        let gz = builder.into_inner().unwrap();
        gz.finish().unwrap();

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out).unwrap();

        assert!(!out.join("link").exists());
        assert_eq!(fs::read_to_string(out.join("real.txt")).unwrap(), "data");
    }

    #[test]
    fn test_extract_directory_entries() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("dirs.tar.gz");
        write_archive(
            &archive,
            &[
                ("pkg/", EntryType::Directory, ""),
                ("pkg/file.txt", EntryType::Regular, "inside"),
            ],
        );

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out).unwrap();

        assert!(out.join("pkg").is_dir());
        assert_eq!(
            fs::read_to_string(out.join("pkg/file.txt")).unwrap(),
            "inside"
        );
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let dir = tempdir().unwrap();
        let result = extract_tar_gz(&dir.path().join("nope.tar.gz"), &dir.path().join("out"));
        assert!(matches!(result, Err(ParcelError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let archive = dir.path().join("mode.tar.gz");

        let file = File::create(&archive).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(gz);

        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_path("run.sh").unwrap();
        header.set_mode(0o755);
        header.set_size(11);
        header.set_cksum();
        builder.append(&header, "#!/bin/sh\n:".as_bytes()).unwrap();

        let gz = builder.into_inner().unwrap();
        gz.finish().unwrap();

        let out = dir.path().join("out");
        extract_tar_gz(&archive, &out).unwrap();

        let mode = fs::metadata(out.join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
