//! Directory-backed implementation of the remote transport.
//!
//! Treats "remote" paths as ordinary local filesystem paths. Used by
//! tests and for publishing to a mounted share without an SSH hop.

use parcel_core::error::ParcelError;
use std::fs::{self, File};
use std::path::Path;

use crate::{Remote, TransportResult};

/// Remote backed by the local filesystem
#[derive(Debug, Default)]
pub struct LocalRemote;

impl LocalRemote {
    pub fn new() -> Self {
        Self
    }
}

impl Remote for LocalRemote {
    fn list_files(&self, remote_path: &str) -> TransportResult<Vec<String>> {
        let entries = fs::read_dir(remote_path).map_err(|e| {
            ParcelError::io(format!("Failed to list directory {}", remote_path), e)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| ParcelError::io("Failed to read directory entry", e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| ParcelError::io("Failed to read entry type", e))?;
            if file_type.is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }

    fn upload(&self, local_path: &Path, remote_path: &str) -> TransportResult<()> {
        copy_file(local_path, Path::new(remote_path))
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> TransportResult<()> {
        copy_file(Path::new(remote_path), local_path)
    }

    fn ensure_dir(&self, remote_path: &str) -> TransportResult<()> {
        fs::create_dir_all(remote_path).map_err(|e| {
            ParcelError::io(format!("Failed to create directory {}", remote_path), e)
        })
    }

    fn file_exists(&self, remote_path: &str) -> TransportResult<bool> {
        Ok(Path::new(remote_path).exists())
    }

    fn file_size(&self, remote_path: &str) -> TransportResult<u64> {
        let metadata = fs::metadata(remote_path)
            .map_err(|e| ParcelError::io(format!("Failed to stat {}", remote_path), e))?;
        Ok(metadata.len())
    }
}

/// Copy one file, creating the destination's parent directories
fn copy_file(from: &Path, to: &Path) -> TransportResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ParcelError::io(format!("Failed to create directory {}", parent.display()), e)
        })?;
    }

    let mut source = File::open(from)
        .map_err(|e| ParcelError::io(format!("Failed to open {}", from.display()), e))?;
    let mut dest = File::create(to)
        .map_err(|e| ParcelError::io(format!("Failed to create {}", to.display()), e))?;

    std::io::copy(&mut source, &mut dest)
        .map_err(|e| ParcelError::io("Failed to copy file", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_files_excludes_directories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pkg-1.0.0.tar.gz"), "x").unwrap();
        fs::write(dir.path().join("pkg-1.1.0.tar.gz"), "y").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let remote = LocalRemote::new();
        let mut names = remote
            .list_files(&dir.path().to_string_lossy())
            .unwrap();
        names.sort();

        assert_eq!(names, vec!["pkg-1.0.0.tar.gz", "pkg-1.1.0.tar.gz"]);
    }

    #[test]
    fn test_upload_download_round_trip() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.tar.gz");
        fs::write(&source, "archive bytes").unwrap();

        let remote = LocalRemote::new();
        let remote_path = dir.path().join("store/pkg-1.0.0.tar.gz");
        remote
            .upload(&source, &remote_path.to_string_lossy())
            .unwrap();
        assert!(remote
            .file_exists(&remote_path.to_string_lossy())
            .unwrap());
        assert_eq!(
            remote.file_size(&remote_path.to_string_lossy()).unwrap(),
            13
        );

        let fetched = dir.path().join("downloads/fetched.tar.gz");
        remote
            .download(&remote_path.to_string_lossy(), &fetched)
            .unwrap();
        assert_eq!(fs::read_to_string(&fetched).unwrap(), "archive bytes");
    }

    #[test]
    fn test_ensure_dir_is_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");

        let remote = LocalRemote::new();
        remote.ensure_dir(&nested.to_string_lossy()).unwrap();
        assert!(nested.is_dir());

        // Idempotent
        remote.ensure_dir(&nested.to_string_lossy()).unwrap();
    }
}
