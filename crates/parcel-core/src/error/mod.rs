//! Error types and result aliases for Parcel operations.
//!
//! Provides a unified error type that covers all error conditions
//! across the Parcel ecosystem with actionable error messages.

use thiserror::Error;

/// Unified error type for all Parcel operations
#[derive(Error, Debug)]
pub enum ParcelError {
    // Version errors
    #[error("Invalid version format: {input}")]
    InvalidFormat { input: String },

    // Pattern errors
    #[error("Invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Archive errors
    #[error("No files found matching patterns: {patterns:?}")]
    NoFilesMatched { patterns: Vec<String> },

    #[error("Illegal file path in archive: {path}")]
    IllegalPath { path: String },

    // Selection errors
    #[error("No packages found for {name}")]
    NoPackagesFound { name: String },

    #[error("No packages found for {name} matching constraint {constraint}")]
    NoVersionSatisfiesConstraint { name: String, constraint: String },

    // Config errors
    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: String, message: String },

    // Transport errors
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Parcel operations
pub type ParcelResult<T> = Result<T, ParcelError>;

impl ParcelError {
    /// Create a transport error from any error type
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ParcelError::Transport { .. } | ParcelError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ParcelError::NoPackagesFound { .. } => {
                Some("Check the package name spelling or list the remote directory")
            },
            ParcelError::NoVersionSatisfiesConstraint { .. } => {
                Some("Relax the version constraint or publish a matching version")
            },
            ParcelError::NoFilesMatched { .. } => {
                Some("Check the target patterns in the packet manifest")
            },
            ParcelError::Transport { .. } => {
                Some("Check the remote host, credentials and network connection")
            },
            _ => None,
        }
    }
}
