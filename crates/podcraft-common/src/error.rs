//! Unified error types for the podcraft workspace.
//!
//! [`PodcraftError`] covers loading and validating inputs. [`BuildError`]
//! is what a build unit reports when one of its lifecycle operations fails;
//! it always carries the underlying cause.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed cause carried by a [`BuildError`].
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PodcraftError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration or manifest value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid value.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A YAML manifest could not be parsed.
    #[error("cannot parse manifest {path}: {source}")]
    Manifest {
        /// Manifest file being parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl PodcraftError {
    /// Wraps an I/O error with the path it occurred at.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PodcraftError>;

/// Failure of a build unit, pairing a human message with its cause.
///
/// Rendering concatenates the message and the cause. The cause is a
/// required constructor argument, so a `BuildError` always names a more
/// specific failure.
#[derive(Debug, Error)]
#[error("{message} {source}")]
pub struct BuildError {
    message: String,
    source: Cause,
}

impl BuildError {
    /// Creates a build error from a message and its underlying cause.
    pub fn new(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Creates a build error caused by an I/O failure at `path`.
    #[must_use]
    pub fn from_io(message: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::new(message, PodcraftError::io(path, source))
    }

    /// Returns the human message without the cause.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying cause.
    #[must_use]
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

impl From<PodcraftError> for BuildError {
    fn from(err: PodcraftError) -> Self {
        let message = match &err {
            PodcraftError::Io { .. } => "I/O failure:",
            PodcraftError::Config { .. } | PodcraftError::Manifest { .. } => "malformed manifest:",
            PodcraftError::NotFound { .. } => "missing input:",
            PodcraftError::Serialization { .. } => "cannot serialize:",
        };
        Self::new(message, err)
    }
}
