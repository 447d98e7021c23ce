//! Best-version selection over a remote file listing.
//!
//! Published archives are named `<name>-<version>.tar.gz`. Selection
//! parses the embedded versions, filters them by the requested
//! constraint and returns the filename of the highest match.

use parcel_core::error::ParcelError;
use parcel_core::types::Version;
use tracing::{debug, warn};

use crate::ResolverResult;

/// A remote archive paired with its parsed version
#[derive(Debug, Clone)]
pub struct Candidate {
    pub filename: String,
    pub version: Version,
}

/// Select the best published version of a package from a remote listing.
///
/// Filenames that do not have the `<name>-<version>.tar.gz` shape are
/// ignored; ones whose embedded version does not parse are skipped with
/// a warning. Among candidates satisfying the constraint the highest
/// version wins; equal versions keep their listing order (stable sort),
/// so the first one encountered is returned.
pub fn select_best_version(
    remote_files: &[String],
    package_name: &str,
    constraint: &str,
) -> ResolverResult<String> {
    let mut candidates = Vec::new();

    for filename in remote_files {
        let version_str = match embedded_version(filename, package_name) {
            Some(version_str) => version_str,
            None => continue,
        };

        match version_str.parse::<Version>() {
            Ok(version) => candidates.push(Candidate {
                filename: filename.clone(),
                version,
            }),
            Err(e) => {
                warn!("Could not parse version from {}: {}", filename, e);
            },
        }
    }

    if candidates.is_empty() {
        return Err(ParcelError::NoPackagesFound {
            name: package_name.to_string(),
        });
    }

    debug!(
        "Found {} candidate(s) for {}: {:?}",
        candidates.len(),
        package_name,
        candidates
            .iter()
            .map(|c| c.filename.as_str())
            .collect::<Vec<_>>()
    );

    let mut valid: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.version.satisfies(constraint))
        .collect();

    if valid.is_empty() {
        return Err(ParcelError::NoVersionSatisfiesConstraint {
            name: package_name.to_string(),
            constraint: constraint.to_string(),
        });
    }

    // Stable descending sort; ties resolve to the earlier listing entry
    valid.sort_by(|a, b| b.version.cmp(&a.version));

    let selected = valid[0];
    debug!(
        "Selected {} (version {}) from {} valid candidate(s)",
        selected.filename,
        selected.version,
        valid.len()
    );

    Ok(selected.filename.clone())
}

/// Extract the version substring from `<name>-<version>.tar.gz`.
fn embedded_version<'a>(filename: &'a str, package_name: &str) -> Option<&'a str> {
    filename
        .strip_prefix(package_name)?
        .strip_prefix('-')?
        .strip_suffix(".tar.gz")
}
