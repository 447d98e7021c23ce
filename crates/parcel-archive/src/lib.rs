//! File collection and tar.gz packaging for Parcel
//!
//! This crate turns the target patterns of a packet manifest into a set
//! of files and packages them as a gzip-compressed tar archive. It also
//! provides the matching extractor with directory-traversal protection.

pub mod pattern;
pub mod tarball;

// Re-export main functions
pub use pattern::{collect_files, collect_files_with_exclude};
pub use tarball::{create_tar_gz, extract_tar_gz};

use parcel_core::error::ParcelError;

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ParcelError>;
