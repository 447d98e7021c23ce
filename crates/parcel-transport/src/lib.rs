//! Remote transport for Parcel
//!
//! This crate moves package archives between the local machine and the
//! package host. The `Remote` trait captures exactly the capabilities
//! the rest of the system needs; `SftpRemote` implements it over SSH,
//! and `LocalRemote` over a plain directory for testing and file-based
//! mirrors.

pub mod local;
pub mod sftp;

// Re-export main types
pub use local::LocalRemote;
pub use sftp::SftpRemote;

use parcel_core::error::ParcelError;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, ParcelError>;

/// The remote-side operations the package manager depends on.
///
/// Paths are remote-absolute strings; listings return base names of
/// regular files only.
pub trait Remote {
    /// List the file base names in a remote directory
    fn list_files(&self, remote_path: &str) -> TransportResult<Vec<String>>;

    /// Upload a local file to the given remote path
    fn upload(&self, local_path: &std::path::Path, remote_path: &str) -> TransportResult<()>;

    /// Download a remote file, creating local parent directories as needed
    fn download(&self, remote_path: &str, local_path: &std::path::Path) -> TransportResult<()>;

    /// Create the remote directory (and parents) if absent
    fn ensure_dir(&self, remote_path: &str) -> TransportResult<()>;

    /// Check if a remote file exists
    fn file_exists(&self, remote_path: &str) -> TransportResult<bool>;

    /// Size in bytes of a remote file
    fn file_size(&self, remote_path: &str) -> TransportResult<u64>;
}
