//! Application container image builder.
//!
//! An [`AciBuilder`] turns an app source directory into an image under its
//! target directory:
//!
//! ```text
//! <target>/
//!   image/
//!     manifest          # JSON app manifest
//!     rootfs/           # copy of <source>/rootfs
//!   build-info.json
//!   image.sha256        # fingerprint of the inputs of the last build
//!   <name>-<version>.aci  # with `zip`
//! ```

pub mod archive;
pub mod fingerprint;
pub mod script;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use podcraft_common::config::BuildArgs;
use podcraft_common::constants::{
    ACI_EXTENSION, BUILD_INFO_FILE, FINGERPRINT_FILE, IMAGE_DIR, IMAGE_MANIFEST_FILE, ROOTFS_DIR,
    TESTS_DIR,
};
use podcraft_common::error::{BuildError, PodcraftError};
use podcraft_common::types::AciName;
use podcraft_manifest::AciManifest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::unit::{AppBuilder, AppBuilderFactory};

/// Metadata recorded next to each built image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Unique identifier of the build.
    pub build_id: Uuid,
    /// Completion time of the build.
    pub built_at: DateTime<Utc>,
    /// Image that was built.
    pub image: AciName,
    /// Pod the image was built for, if any.
    pub pod: Option<String>,
    /// Fingerprint of the build inputs.
    pub fingerprint: String,
    /// Packaged archive, when `zip` was requested.
    pub archive: Option<PathBuf>,
}

/// Builds, cleans, and tests one application container image.
#[derive(Debug)]
pub struct AciBuilder {
    source: PathBuf,
    target: PathBuf,
    args: Arc<BuildArgs>,
    manifest: AciManifest,
    pod_name: Option<String>,
}

impl AciBuilder {
    /// Creates a builder for the app in `source`, writing under `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not a directory or the manifest
    /// fails validation.
    pub fn new(
        source: &Path,
        target: &Path,
        args: Arc<BuildArgs>,
        manifest: AciManifest,
    ) -> Result<Self, BuildError> {
        if !source.is_dir() {
            return Err(BuildError::new(
                format!("cannot use source of {}:", manifest.name),
                PodcraftError::NotFound {
                    kind: "app source directory",
                    id: source.display().to_string(),
                },
            ));
        }
        podcraft_manifest::validator::validate_aci(&manifest).map_err(|e| {
            BuildError::new(format!("malformed manifest for {}:", manifest.name), e)
        })?;

        Ok(Self {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            args,
            manifest,
            pod_name: None,
        })
    }

    /// Returns the image manifest.
    #[must_use]
    pub const fn manifest(&self) -> &AciManifest {
        &self.manifest
    }

    /// Returns the shared build configuration.
    #[must_use]
    pub fn args(&self) -> &BuildArgs {
        &self.args
    }

    /// Returns the pod this builder was tagged with.
    #[must_use]
    pub fn pod_name(&self) -> Option<&str> {
        self.pod_name.as_deref()
    }

    /// Returns the output directory of this image.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Returns the assembled image directory.
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.target.join(IMAGE_DIR)
    }

    /// Returns the path of the packaged image.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.target
            .join(format!("{}{ACI_EXTENSION}", self.manifest.file_stem()))
    }

    fn rootfs_source(&self) -> PathBuf {
        self.source.join(ROOTFS_DIR)
    }

    fn fingerprint_path(&self) -> PathBuf {
        self.target.join(FINGERPRINT_FILE)
    }

    fn is_up_to_date(&self, fingerprint: &str) -> bool {
        let built = self.image_dir().join(IMAGE_MANIFEST_FILE).is_file();
        // The archive must exist exactly when packaging is requested.
        let packaged = self.archive_path().is_file() == self.args.zip;
        built
            && packaged
            && fingerprint::read_recorded(&self.fingerprint_path()).as_deref() == Some(fingerprint)
    }

    fn error(&self, action: &str, cause: impl Into<PodcraftError>) -> BuildError {
        let owner = self
            .pod_name
            .as_ref()
            .map_or_else(String::new, |pod| format!(" (pod {pod})"));
        let cause: PodcraftError = cause.into();
        BuildError::new(
            format!("cannot {action} {}{owner}:", self.manifest.name),
            cause,
        )
    }

    fn assemble(&self, fingerprint: String) -> Result<(), BuildError> {
        let fingerprint_path = self.fingerprint_path();
        remove_file_if_present(&fingerprint_path).map_err(|e| self.error("build", e))?;
        let image = self.image_dir();
        remove_dir_if_present(&image).map_err(|e| self.error("build", e))?;
        std::fs::create_dir_all(&image)
            .map_err(|e| self.error("build", PodcraftError::io(&image, e)))?;

        let manifest_path = image.join(IMAGE_MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(&self.manifest).map_err(|e| self.error("build", e))?;
        std::fs::write(&manifest_path, json)
            .map_err(|e| self.error("build", PodcraftError::io(&manifest_path, e)))?;

        let rootfs = image.join(ROOTFS_DIR);
        if self.rootfs_source().is_dir() {
            let copied = archive::copy_tree(&self.rootfs_source(), &rootfs)
                .map_err(|e| self.error("build", e))?;
            tracing::debug!(aci = %self.manifest.name, files = copied, "rootfs copied");
        } else {
            std::fs::create_dir_all(&rootfs)
                .map_err(|e| self.error("build", PodcraftError::io(&rootfs, e)))?;
        }

        let archive_path = if self.args.zip {
            let path = self.archive_path();
            let _ = archive::package(&image, &path).map_err(|e| self.error("package", e))?;
            Some(path)
        } else {
            let stale = self.archive_path();
            remove_file_if_present(&stale).map_err(|e| self.error("build", e))?;
            None
        };

        let info = BuildInfo {
            build_id: Uuid::new_v4(),
            built_at: Utc::now(),
            image: self.manifest.name.clone(),
            pod: self.pod_name.clone(),
            fingerprint: fingerprint.clone(),
            archive: archive_path,
        };
        let info_path = self.target.join(BUILD_INFO_FILE);
        let json = serde_json::to_vec_pretty(&info).map_err(|e| self.error("build", e))?;
        std::fs::write(&info_path, json)
            .map_err(|e| self.error("build", PodcraftError::io(&info_path, e)))?;

        // Written last: an interrupted build never looks up to date.
        std::fs::write(&fingerprint_path, fingerprint)
            .map_err(|e| self.error("build", PodcraftError::io(&fingerprint_path, e)))?;
        Ok(())
    }
}

impl AppBuilder for AciBuilder {
    fn set_pod_name(&mut self, pod: String) {
        self.pod_name = Some(pod);
    }

    fn build(&mut self) -> Result<(), BuildError> {
        tracing::info!(
            aci = %self.manifest.name,
            pod = ?self.pod_name,
            target_dir = %self.target.display(),
            "building aci"
        );
        let fingerprint = fingerprint::compute(&self.manifest, &self.rootfs_source())
            .map_err(|e| self.error("fingerprint", e))?;

        if self.args.force_update {
            tracing::debug!(aci = %self.manifest.name, "forced rebuild");
        } else if self.is_up_to_date(&fingerprint) {
            tracing::info!(aci = %self.manifest.name, "image is up to date");
            return Ok(());
        }

        self.assemble(fingerprint)?;
        tracing::info!(aci = %self.manifest.name, "aci built");
        Ok(())
    }

    fn clean(&mut self) -> Result<(), BuildError> {
        tracing::info!(aci = %self.manifest.name, target_dir = %self.target.display(), "cleaning aci");
        remove_dir_if_present(&self.target).map_err(|e| self.error("clean", e))
    }

    fn test(&mut self) -> Result<(), BuildError> {
        tracing::info!(aci = %self.manifest.name, pod = ?self.pod_name, "testing aci");
        let image = self.image_dir();
        if !image.join(IMAGE_MANIFEST_FILE).is_file() {
            return Err(self.error(
                "test",
                PodcraftError::NotFound {
                    kind: "built image",
                    id: image.display().to_string(),
                },
            ));
        }

        let scripts =
            script::discover(&self.source.join(TESTS_DIR)).map_err(|e| self.error("test", e))?;
        if scripts.is_empty() {
            tracing::info!(aci = %self.manifest.name, "no tests to run");
            return Ok(());
        }

        let shell = script::find_shell().map_err(|e| self.error("test", e))?;
        let name = PathBuf::from(self.manifest.name.to_string());
        let rootfs = image.join(ROOTFS_DIR);
        let env = [
            ("ACI_NAME", name.as_path()),
            ("ACI_ROOTFS", rootfs.as_path()),
            ("ACI_TARGET", self.target.as_path()),
        ];
        for path in &scripts {
            let _ = script::run(&shell, path, &self.source, &env).map_err(|e| {
                BuildError::new(format!("test failed for {}:", self.manifest.name), e)
            })?;
        }
        tracing::info!(aci = %self.manifest.name, tests = scripts.len(), "tests passed");
        Ok(())
    }
}

/// Constructs [`AciBuilder`] units.
#[derive(Debug, Clone, Copy, Default)]
pub struct AciBuilderFactory;

impl AppBuilderFactory for AciBuilderFactory {
    fn construct(
        &self,
        source: &Path,
        target: &Path,
        args: Arc<BuildArgs>,
        manifest: AciManifest,
    ) -> Result<Box<dyn AppBuilder>, BuildError> {
        Ok(Box::new(AciBuilder::new(source, target, args, manifest)?))
    }
}

fn remove_file_if_present(path: &Path) -> Result<(), PodcraftError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PodcraftError::io(path, e)),
    }
}

fn remove_dir_if_present(path: &Path) -> Result<(), PodcraftError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PodcraftError::io(path, e)),
    }
}
