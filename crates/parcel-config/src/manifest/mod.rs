//! Packet and install manifests.
//!
//! A packet manifest describes one publishable package: its name,
//! version and the target patterns that select its files. An install
//! manifest lists the packages to fetch from the remote, each with an
//! optional version constraint. Both load from JSON or TOML, picked by
//! file extension.

use parcel_core::error::{ParcelError, ParcelResult};
use parcel_core::utils::path::get_extension;
use serde::Deserialize;
use std::path::Path;

use crate::ConfigResult;

/// One include rule in a packet manifest.
///
/// A target is either a bare glob string or a table with its own
/// exclude patterns; the simple shape is tried first when decoding.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Bare(String),
    Full {
        path: String,
        #[serde(default)]
        exclude: Vec<String>,
    },
}

impl Target {
    /// The include pattern of this target
    pub fn path(&self) -> &str {
        match self {
            Target::Bare(path) => path,
            Target::Full { path, .. } => path,
        }
    }

    /// The exclude patterns local to this target
    pub fn exclude(&self) -> &[String] {
        match self {
            Target::Bare(_) => &[],
            Target::Full { exclude, .. } => exclude,
        }
    }
}

/// A dependency declaration. Parsed for forward compatibility; version
/// resolution does not consume these.
#[derive(Debug, Clone, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(rename = "ver", default)]
    pub version: Option<String>,
}

/// Manifest describing a package to create and publish
#[derive(Debug, Clone, Deserialize)]
pub struct PacketManifest {
    pub name: String,
    #[serde(rename = "ver")]
    pub version: String,
    pub targets: Vec<Target>,
    #[serde(rename = "packets", default)]
    pub dependencies: Vec<Dependency>,
}

/// One requested package in an install manifest
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRequest {
    pub name: String,
    #[serde(rename = "ver", default)]
    pub version: Option<String>,
}

impl PackageRequest {
    /// The version constraint string; empty means any version
    pub fn constraint(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// Manifest listing the packages to install
#[derive(Debug, Clone, Deserialize)]
pub struct InstallManifest {
    pub packages: Vec<PackageRequest>,
}

impl PacketManifest {
    /// Load a packet manifest from a JSON or TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_config(path)
    }

    /// Pool the include and exclude patterns across all targets.
    ///
    /// Excludes are global: a pattern declared on one target filters the
    /// matches of every target.
    pub fn pooled_patterns(&self) -> (Vec<String>, Vec<String>) {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for target in &self.targets {
            include.push(target.path().to_string());
            exclude.extend(target.exclude().iter().cloned());
        }

        (include, exclude)
    }
}

impl InstallManifest {
    /// Load an install manifest from a JSON or TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        load_config(path)
    }
}

/// Read and decode a config file, picking the format by extension.
fn load_config<T: for<'de> Deserialize<'de>>(path: &Path) -> ParcelResult<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ParcelError::io(format!("Failed to read {}", path.display()), e))?;

    match get_extension(path).as_deref() {
        Some("json") => serde_json::from_str(&data).map_err(|e| ParcelError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        Some("toml") => toml::from_str(&data).map_err(|e| ParcelError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        _ => Err(ParcelError::ConfigValidation {
            field: "path".to_string(),
            reason: format!("unsupported config file format: {}", path.display()),
        }),
    }
}
