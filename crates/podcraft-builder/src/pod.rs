//! Pod lifecycle orchestration.
//!
//! A [`Pod`] owns a pod manifest, the pod's source directory, its target
//! directory, and the shared [`BuildArgs`]. Each lifecycle call walks the
//! manifest's apps in declaration order, constructs a fresh unit per app
//! through an [`AppBuilderFactory`], tags it with the pod name, and runs the
//! requested operation. The first failure ends the call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use podcraft_common::config::BuildArgs;
use podcraft_common::constants::POD_OUTPUT_FILE;
use podcraft_common::error::PodcraftError;
use podcraft_common::types::{AciName, Operation};
use podcraft_manifest::pod::RuntimeApp;
use podcraft_manifest::{AciManifest, NameValue, PodManifest};
use serde::{Deserialize, Serialize};

use crate::aci::AciBuilderFactory;
use crate::error::PodError;
use crate::event::{PodEvent, Reporter, TracingReporter};
use crate::unit::{AppBuilder, AppBuilderFactory};

/// Resolved pod manifest written at the end of a pod build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodOutput {
    /// Pod name.
    pub name: AciName,
    /// Built apps in declaration order.
    pub apps: Vec<PodOutputApp>,
    /// Pod annotations.
    pub annotations: Vec<NameValue>,
}

/// One app of a built pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodOutputApp {
    /// App name.
    pub name: String,
    /// Image built for the app.
    pub image: AciName,
}

/// A named group of app images built, cleaned, and tested together.
pub struct Pod {
    manifest: PodManifest,
    path: PathBuf,
    target: PathBuf,
    args: Arc<BuildArgs>,
    factory: Box<dyn AppBuilderFactory>,
    reporter: Box<dyn Reporter>,
}

impl std::fmt::Debug for Pod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pod")
            .field("manifest", &self.manifest)
            .field("path", &self.path)
            .field("target", &self.target)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Pod {
    /// Loads the pod defined in `path`.
    ///
    /// The target directory is `args.target_path`, or `<path>/target`.
    ///
    /// # Errors
    ///
    /// Returns `PodError::Load` if the manifest is missing or invalid.
    pub fn open(path: impl Into<PathBuf>, args: BuildArgs) -> Result<Self, PodError> {
        let path = path.into();
        let manifest =
            podcraft_manifest::load_pod_manifest(&path).map_err(|e| PodError::Load {
                path: path.clone(),
                source: e,
            })?;
        let target = args.resolve_target(&path);
        Ok(Self::new(manifest, path, target, args))
    }

    /// Creates a pod from an already loaded manifest.
    #[must_use]
    pub fn new(
        manifest: PodManifest,
        path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        args: BuildArgs,
    ) -> Self {
        Self {
            manifest,
            path: path.into(),
            target: target.into(),
            args: Arc::new(args),
            factory: Box::new(AciBuilderFactory),
            reporter: Box::new(TracingReporter),
        }
    }

    /// Replaces the factory used to construct app units.
    #[must_use]
    pub fn with_factory(mut self, factory: impl AppBuilderFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Replaces the reporter receiving lifecycle events.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Returns the pod name.
    #[must_use]
    pub const fn name(&self) -> &AciName {
        &self.manifest.name
    }

    /// Returns the pod manifest.
    #[must_use]
    pub const fn manifest(&self) -> &PodManifest {
        &self.manifest
    }

    /// Returns the pod's source directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the pod's target directory.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the shared build configuration.
    #[must_use]
    pub fn args(&self) -> &BuildArgs {
        &self.args
    }

    /// Derives the image manifest of one of this pod's apps.
    ///
    /// # Errors
    ///
    /// Returns `PodError::InvalidAppName` if the app name is not a safe path
    /// component or cannot form an image name.
    pub fn to_aci_manifest(&self, entry: &RuntimeApp) -> Result<AciManifest, PodError> {
        podcraft_manifest::to_aci_manifest(&self.manifest.name, entry).map_err(|source| {
            PodError::InvalidAppName {
                pod: self.pod_label(),
                app: entry.name.clone(),
                source,
            }
        })
    }

    /// Removes the pod's target directory, then cleans every app.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be removed, in which case no
    /// app is cleaned, or at the first app that fails.
    pub fn clean(&self) -> Result<(), PodError> {
        self.started(Operation::Clean);
        self.remove_target()?;
        self.run_apps(Operation::Clean)?;
        self.finished(Operation::Clean);
        Ok(())
    }

    /// Runs every app's tests. Nothing is cleaned or rebuilt first.
    ///
    /// # Errors
    ///
    /// Returns an error at the first app whose unit cannot be constructed
    /// or whose tests fail.
    pub fn test(&self) -> Result<(), PodError> {
        self.started(Operation::Test);
        self.run_apps(Operation::Test)?;
        self.finished(Operation::Test);
        Ok(())
    }

    /// Builds every app, then writes the resolved pod manifest.
    ///
    /// Runs [`Pod::clean`] first when `args.clean` is set. Packaging follows
    /// `args.zip`, which every unit reads from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the clean pass fails, at the first app that
    /// fails to build, or if the pod output cannot be written.
    pub fn build(&self) -> Result<(), PodError> {
        if self.args.clean {
            self.clean()?;
        }
        self.started(Operation::Build);
        self.run_apps(Operation::Build)?;
        self.write_output()?;
        self.finished(Operation::Build);
        Ok(())
    }

    fn pod_label(&self) -> String {
        self.manifest.name.to_string()
    }

    fn started(&self, operation: Operation) {
        self.reporter.report(&PodEvent::PodStarted {
            pod: self.pod_label(),
            operation,
            apps: self.manifest.apps().len(),
        });
    }

    fn finished(&self, operation: Operation) {
        self.reporter.report(&PodEvent::PodFinished {
            pod: self.pod_label(),
            operation,
        });
    }

    fn remove_target(&self) -> Result<(), PodError> {
        let fail = |source: std::io::Error| PodError::CleanTarget {
            pod: self.pod_label(),
            target: self.target.clone(),
            source,
        };
        if self.target.as_os_str().is_empty() || self.target.parent().is_none() {
            return Err(fail(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "refusing to remove an empty or root target",
            )));
        }
        if let Some(source) = self.source_inside_target() {
            return Err(fail(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("target contains the sources at {}", source.display()),
            )));
        }
        match std::fs::remove_dir_all(&self.target) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(target_dir = %self.target.display(), "target already absent");
            }
            Err(e) => return Err(fail(e)),
        }
        self.reporter.report(&PodEvent::TargetRemoved {
            pod: self.pod_label(),
            target: self.target.clone(),
        });
        Ok(())
    }

    /// Returns the first source directory (the pod's or an app's) that lies
    /// at or below the target, which a clean would otherwise delete.
    fn source_inside_target(&self) -> Option<PathBuf> {
        let target = canonical_or_self(&self.target);
        std::iter::once(self.path.clone())
            .chain(
                self.manifest
                    .apps()
                    .iter()
                    .map(|entry| self.path.join(&entry.name)),
            )
            .find(|source| {
                source.starts_with(&self.target) || canonical_or_self(source).starts_with(&target)
            })
    }

    fn run_apps(&self, operation: Operation) -> Result<(), PodError> {
        for entry in self.manifest.apps() {
            self.reporter.report(&PodEvent::AppStarted {
                pod: self.pod_label(),
                app: entry.name.clone(),
                operation,
            });
            if let Err(err) = self.run_app(entry, operation) {
                self.reporter.report(&PodEvent::AppFailed {
                    pod: self.pod_label(),
                    app: entry.name.clone(),
                    operation,
                    error: err.to_string(),
                });
                return Err(err);
            }
            self.reporter.report(&PodEvent::AppFinished {
                pod: self.pod_label(),
                app: entry.name.clone(),
                operation,
            });
        }
        Ok(())
    }

    fn run_app(&self, entry: &RuntimeApp, operation: Operation) -> Result<(), PodError> {
        let mut unit = self.construct(entry)?;
        unit.set_pod_name(self.pod_label());
        let result = match operation {
            Operation::Build => unit.build(),
            Operation::Clean => unit.clean(),
            Operation::Test => unit.test(),
        };
        result.map_err(|source| PodError::Operation {
            pod: self.pod_label(),
            app: entry.name.clone(),
            operation,
            source,
        })
    }

    fn construct(&self, entry: &RuntimeApp) -> Result<Box<dyn AppBuilder>, PodError> {
        // App names become path components under both the source and the
        // target root; the manifest is checked again in case it was built
        // in code.
        let manifest = self.to_aci_manifest(entry)?;
        let source = self.path.join(&entry.name);
        let target = self.target.join(&entry.name);
        self.factory
            .construct(
                &source,
                &target,
                Arc::clone(&self.args),
                manifest,
            )
            .map_err(|source| PodError::Construction {
                pod: self.pod_label(),
                app: entry.name.clone(),
                source,
            })
    }

    fn write_output(&self) -> Result<(), PodError> {
        let fail = |source: PodcraftError| PodError::WriteOutput {
            pod: self.pod_label(),
            source,
        };
        let apps = self
            .manifest
            .apps()
            .iter()
            .map(|entry| -> Result<PodOutputApp, PodError> {
                Ok(PodOutputApp {
                    name: entry.name.clone(),
                    image: self.to_aci_manifest(entry)?.name,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let output = PodOutput {
            name: self.manifest.name.clone(),
            apps,
            annotations: self.manifest.pod.annotations.clone(),
        };
        std::fs::create_dir_all(&self.target)
            .map_err(|e| fail(PodcraftError::io(&self.target, e)))?;
        let path = self.target.join(POD_OUTPUT_FILE);
        let json = serde_json::to_vec_pretty(&output).map_err(|e| fail(e.into()))?;
        std::fs::write(&path, json).map_err(|e| fail(PodcraftError::io(&path, e)))?;
        tracing::info!(pod = %self.manifest.name, path = %path.display(), "pod manifest written");
        Ok(())
    }
}

fn canonical_or_self(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
