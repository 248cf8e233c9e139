//! Errors surfaced by pod operations.

use std::path::PathBuf;

use podcraft_common::error::{BuildError, PodcraftError};
use podcraft_common::types::Operation;
use thiserror::Error;

/// Broad class of a pod failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pod itself could not be loaded.
    Load,
    /// A build unit could not be constructed for an app.
    Construction,
    /// A pod-level filesystem mutation failed.
    Filesystem,
    /// A unit's build, clean, or test failed.
    Operation,
}

/// Failure of a pod operation. The operation stops at the first one.
#[derive(Debug, Error)]
pub enum PodError {
    /// The pod manifest could not be loaded.
    #[error("cannot load pod at {path}: {source}")]
    Load {
        /// Pod directory.
        path: PathBuf,
        /// Underlying error.
        source: PodcraftError,
    },

    /// An app name would resolve outside the pod directories or cannot
    /// form an image name.
    #[error("invalid app name {app:?} in pod {pod}: {source}")]
    InvalidAppName {
        /// Pod name.
        pod: String,
        /// Offending app name.
        app: String,
        /// Validation error.
        source: PodcraftError,
    },

    /// A build unit could not be constructed.
    #[error("cannot construct builder for app {app} of pod {pod}: {source}")]
    Construction {
        /// Pod name.
        pod: String,
        /// App name.
        app: String,
        /// Error reported by the factory.
        source: BuildError,
    },

    /// The pod's target directory could not be removed.
    #[error("cannot clean pod {pod} at {target}: {source}")]
    CleanTarget {
        /// Pod name.
        pod: String,
        /// Target directory.
        target: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A unit's lifecycle operation failed.
    #[error("{operation} failed for app {app} of pod {pod}: {source}")]
    Operation {
        /// Pod name.
        pod: String,
        /// App name.
        app: String,
        /// Operation that failed.
        operation: Operation,
        /// Error reported by the unit.
        source: BuildError,
    },

    /// The pod-level build output could not be written.
    #[error("cannot write output of pod {pod}: {source}")]
    WriteOutput {
        /// Pod name.
        pod: String,
        /// Underlying error.
        source: PodcraftError,
    },
}

impl PodError {
    /// Returns the class of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { .. } => ErrorKind::Load,
            Self::InvalidAppName { .. } | Self::Construction { .. } => ErrorKind::Construction,
            Self::CleanTarget { .. } | Self::WriteOutput { .. } => ErrorKind::Filesystem,
            Self::Operation { .. } => ErrorKind::Operation,
        }
    }

    /// Returns the app the failure is attributed to, if any.
    #[must_use]
    pub fn app(&self) -> Option<&str> {
        match self {
            Self::InvalidAppName { app, .. }
            | Self::Construction { app, .. }
            | Self::Operation { app, .. } => Some(app),
            Self::Load { .. } | Self::CleanTarget { .. } | Self::WriteOutput { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_error_names_pod_app_and_cause() {
        let err = PodError::Construction {
            pod: "web".into(),
            app: "api".into(),
            source: BuildError::new("malformed manifest:", "exec is empty"),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("web"));
        assert!(rendered.contains("api"));
        assert!(rendered.contains("exec is empty"));
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert_eq!(err.app(), Some("api"));
    }

    #[test]
    fn clean_target_is_filesystem_kind() {
        let err = PodError::CleanTarget {
            pod: "web".into(),
            target: PathBuf::from("/out/web"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(err.app(), None);
        assert!(err.to_string().contains("/out/web"));
    }

    #[test]
    fn operation_error_renders_operation() {
        let err = PodError::Operation {
            pod: "web".into(),
            app: "worker".into(),
            operation: Operation::Test,
            source: BuildError::new("test smoke.sh failed", "exit status 1"),
        };
        assert!(err.to_string().starts_with("test failed for app worker of pod web"));
        assert_eq!(err.kind(), ErrorKind::Operation);
    }
}
