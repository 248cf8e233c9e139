//! Pod lifecycle events.
//!
//! The pod reports its progress to an injected [`Reporter`] instead of a
//! process-wide logger, so callers choose where diagnostics go.

use std::path::PathBuf;

use podcraft_common::types::Operation;

/// A pod lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodEvent {
    /// A pod operation began.
    PodStarted {
        /// Pod name.
        pod: String,
        /// Operation being run.
        operation: Operation,
        /// Number of apps the operation covers.
        apps: usize,
    },
    /// The pod's target directory was removed.
    TargetRemoved {
        /// Pod name.
        pod: String,
        /// Directory that was removed.
        target: PathBuf,
    },
    /// An app operation began.
    AppStarted {
        /// Pod name.
        pod: String,
        /// App name.
        app: String,
        /// Operation being run.
        operation: Operation,
    },
    /// An app operation succeeded.
    AppFinished {
        /// Pod name.
        pod: String,
        /// App name.
        app: String,
        /// Operation that ran.
        operation: Operation,
    },
    /// An app operation failed; the pod operation stops here.
    AppFailed {
        /// Pod name.
        pod: String,
        /// App name.
        app: String,
        /// Operation that failed.
        operation: Operation,
        /// Rendered error.
        error: String,
    },
    /// A pod operation completed for every app.
    PodFinished {
        /// Pod name.
        pod: String,
        /// Operation that ran.
        operation: Operation,
    },
}

/// Receives pod lifecycle events.
pub trait Reporter: Send + Sync {
    /// Handles one event.
    fn report(&self, event: &PodEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &PodEvent) {
        match event {
            PodEvent::PodStarted {
                pod,
                operation,
                apps,
            } => tracing::info!(pod = %pod, %operation, apps, "pod operation started"),
            PodEvent::TargetRemoved { pod, target } => {
                tracing::info!(pod = %pod, target_dir = %target.display(), "target removed");
            }
            PodEvent::AppStarted {
                pod,
                app,
                operation,
            } => tracing::info!(pod = %pod, app = %app, %operation, "app operation started"),
            PodEvent::AppFinished {
                pod,
                app,
                operation,
            } => tracing::debug!(pod = %pod, app = %app, %operation, "app operation finished"),
            PodEvent::AppFailed {
                pod,
                app,
                operation,
                error,
            } => tracing::error!(pod = %pod, app = %app, %operation, error = %error, "app operation failed"),
            PodEvent::PodFinished { pod, operation } => {
                tracing::info!(pod = %pod, %operation, "pod operation finished");
            }
        }
    }
}
