//! Remote version selection for Parcel
//!
//! Given the file listing of a remote package directory and a requested
//! package name plus version constraint, this crate picks the single
//! archive to download.

pub mod select;

pub use select::{select_best_version, Candidate};

use parcel_core::error::ParcelError;

/// Result type for resolution operations
pub type ResolverResult<T> = Result<T, ParcelError>;
