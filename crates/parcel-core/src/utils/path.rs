//! Path utilities for safe file system operations.
//!
//! Provides path normalization and the containment check used when
//! extracting archive entries under an output directory.

use std::path::{Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            std::path::Component::CurDir => {
                // Skip current directory
            },
            std::path::Component::ParentDir => {
                // Pop last component if possible, but track if we go negative
                if components.is_empty() {
                    // This would escape the base directory
                    components.push(component);
                } else {
                    components.pop();
                }
            },
            other => {
                components.push(other);
            },
        }
    }

    components.iter().collect()
}

/// Join an archive entry name onto a base directory, refusing escapes.
///
/// Returns the cleaned target path when it is the cleaned base itself or a
/// separator-delimited descendant of it, `None` when the entry would land
/// outside the base.
pub fn join_within(base: &Path, entry: &Path) -> Option<PathBuf> {
    let base = normalize_path(base);
    let target = normalize_path(&base.join(entry));

    if target == base || target.starts_with(&base) {
        Some(target)
    } else {
        None
    }
}

/// Get the file extension as a lowercase string
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
