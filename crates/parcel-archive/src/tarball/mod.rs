//! Tar.gz creation and extraction.
//!
//! Archives are gzip-compressed POSIX tar streams. Entry names are
//! slash-separated paths relative to the working directory at build time,
//! and extraction refuses entries that would land outside the output
//! directory.

pub mod create;
pub mod extract;

// Re-export main functions
pub use create::{archive_files, create_tar_gz};
pub use extract::extract_tar_gz;
