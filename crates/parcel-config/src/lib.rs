//! Configuration parsing for Parcel
//!
//! This crate handles parsing and validation of packet manifests (what
//! to publish), install manifests (what to fetch) and the remote host
//! configuration, providing a unified configuration interface for the
//! CLI.

pub mod manifest;
pub mod remote;

// Re-export main types
pub use manifest::{Dependency, InstallManifest, PacketManifest, PackageRequest, Target};
pub use remote::RemoteConfig;

use parcel_core::error::ParcelError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ParcelError>;
