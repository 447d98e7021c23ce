//! Glob pattern expansion for packet targets.
//!
//! Include patterns expand to a deduplicated set of absolute file paths.
//! Patterns containing `**` are walked recursively; everything else goes
//! through ordinary single-level glob matching. Exclude patterns are
//! matched against file base names only.

use parcel_core::error::ParcelError;
use parcel_core::utils::path::normalize_path;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::ArchiveResult;

/// Collect all files matching the given include patterns.
///
/// Matches are resolved to absolute paths and deduplicated across
/// patterns. Directories and paths that fail to stat are skipped. The
/// order of the result is unspecified.
pub fn collect_files(patterns: &[String]) -> ArchiveResult<Vec<PathBuf>> {
    let mut all_files = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        let matches = if pattern.contains("**") {
            expand_recursive_pattern(pattern)?
        } else {
            expand_glob_pattern(pattern)?
        };

        for matched in matches {
            let abs_path = absolutize(&matched)?;

            // Dangling symlinks and otherwise unreadable matches are
            // treated as not matched rather than failing the collection.
            let metadata = match std::fs::metadata(&abs_path) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            if metadata.is_dir() {
                continue;
            }

            if seen.insert(abs_path.clone()) {
                all_files.push(abs_path);
            }
        }
    }

    Ok(all_files)
}

/// Collect files matching the include patterns, minus any file whose
/// base name matches an exclude pattern.
pub fn collect_files_with_exclude(
    include: &[String],
    exclude: &[String],
) -> ArchiveResult<Vec<PathBuf>> {
    let all_files = collect_files(include)?;

    if exclude.is_empty() {
        return Ok(all_files);
    }

    let exclude_patterns = exclude
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|e| ParcelError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<ArchiveResult<Vec<_>>>()?;

    let filtered = all_files
        .into_iter()
        .filter(|file| {
            let file_name = match file.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => return true,
            };
            !exclude_patterns.iter().any(|p| p.matches(file_name))
        })
        .collect();

    Ok(filtered)
}

/// Expand a non-recursive pattern through ordinary glob matching.
fn expand_glob_pattern(pattern: &str) -> ArchiveResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| ParcelError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    // Entries the glob matched but cannot read are skipped
    Ok(paths.filter_map(|entry| entry.ok()).collect())
}

/// Expand a `**` pattern by walking the directory tree.
///
/// The pattern must contain exactly one `**`. The text before it is the
/// walk root (current directory when empty); the text after it is matched
/// against each regular file's base name.
fn expand_recursive_pattern(pattern: &str) -> ArchiveResult<Vec<PathBuf>> {
    let parts: Vec<&str> = pattern.split("**").collect();
    if parts.len() != 2 {
        return Err(ParcelError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "must contain exactly one **".to_string(),
        });
    }

    let base_path = parts[0].trim_end_matches('/');
    let suffix = parts[1].trim_start_matches('/');

    let base_path = if base_path.is_empty() { "." } else { base_path };

    // A missing walk root means no matches, not a malformed pattern
    if !Path::new(base_path).exists() {
        return Ok(Vec::new());
    }

    // An unparseable suffix can never match a base name
    let suffix_pattern = if suffix.is_empty() {
        None
    } else {
        match glob::Pattern::new(suffix) {
            Ok(pattern) => Some(pattern),
            Err(_) => return Ok(Vec::new()),
        }
    };

    let mut matches = Vec::new();
    for entry in WalkDir::new(base_path)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        match &suffix_pattern {
            None => matches.push(entry.path().to_path_buf()),
            Some(pattern) => {
                let file_name = entry.file_name().to_string_lossy();
                if pattern.matches(&file_name) {
                    matches.push(entry.path().to_path_buf());
                }
            },
        }
    }

    Ok(matches)
}

/// Resolve a matched path to an absolute, normalized form.
fn absolutize(path: &Path) -> ArchiveResult<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| ParcelError::io("Failed to get current directory", e))?;
    Ok(normalize_path(&cwd.join(path)))
}
