//! Contract between a pod and the per-app image builders it drives.

use std::path::Path;
use std::sync::Arc;

use podcraft_common::config::BuildArgs;
use podcraft_common::error::BuildError;
use podcraft_manifest::AciManifest;

/// A build unit for one app image.
///
/// A unit is created for a single lifecycle call and dropped afterwards.
pub trait AppBuilder {
    /// Tags the unit with the pod that owns it, for diagnostics.
    fn set_pod_name(&mut self, pod: String);

    /// Assembles the app image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be assembled or packaged.
    fn build(&mut self) -> Result<(), BuildError>;

    /// Removes the app's build output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be removed.
    fn clean(&mut self) -> Result<(), BuildError>;

    /// Runs the app's tests against its built image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is missing or a test fails.
    fn test(&mut self) -> Result<(), BuildError>;
}

/// Creates build units.
///
/// Implementors decide how an app is built; the pod only supplies the
/// app's source directory, its own output directory, the shared
/// configuration, and the app manifest.
pub trait AppBuilderFactory: Send + Sync {
    /// Constructs a unit for one app.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is malformed or the source
    /// directory cannot be used.
    fn construct(
        &self,
        source: &Path,
        target: &Path,
        args: Arc<BuildArgs>,
        manifest: AciManifest,
    ) -> Result<Box<dyn AppBuilder>, BuildError>;
}
