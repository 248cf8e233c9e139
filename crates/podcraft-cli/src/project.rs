//! Project detection: a directory is either a pod or a single image.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use podcraft_builder::aci::AciBuilder;
use podcraft_builder::pod::Pod;
use podcraft_builder::unit::AppBuilder;
use podcraft_common::config::BuildArgs;
use podcraft_common::constants::{ACI_MANIFEST_FILE, POD_MANIFEST_FILE};
use podcraft_common::types::Operation;

/// A buildable project found on disk.
#[derive(Debug)]
pub enum Project {
    /// A directory holding `pod-manifest.yml`.
    Pod(Pod),
    /// A directory holding `aci-manifest.yml`.
    Aci(AciBuilder),
}

impl Project {
    /// Detects the project in `path`. A pod manifest takes precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if no manifest is present or it cannot be loaded.
    pub fn detect(path: &Path, args: BuildArgs) -> anyhow::Result<Self> {
        if path.join(POD_MANIFEST_FILE).is_file() {
            return Ok(Self::Pod(Pod::open(path, args)?));
        }
        if path.join(ACI_MANIFEST_FILE).is_file() {
            let manifest = podcraft_manifest::load_aci_manifest(path)
                .with_context(|| format!("cannot load image at {}", path.display()))?;
            let target = args.resolve_target(path);
            let builder = AciBuilder::new(path, &target, Arc::new(args), manifest)?;
            return Ok(Self::Aci(builder));
        }
        bail!(
            "no {POD_MANIFEST_FILE} or {ACI_MANIFEST_FILE} in {}",
            path.display()
        )
    }

    /// Returns the pod or image name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Pod(pod) => pod.name().to_string(),
            Self::Aci(aci) => aci.manifest().name.to_string(),
        }
    }

    /// Returns the number of images the project covers.
    #[must_use]
    pub fn image_count(&self) -> usize {
        match self {
            Self::Pod(pod) => pod.manifest().apps().len(),
            Self::Aci(_) => 1,
        }
    }

    /// Runs `operation` on the project.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the operation.
    pub fn run(&mut self, operation: Operation) -> anyhow::Result<()> {
        match self {
            Self::Pod(pod) => match operation {
                Operation::Build => pod.build()?,
                Operation::Clean => pod.clean()?,
                Operation::Test => pod.test()?,
            },
            Self::Aci(aci) => match operation {
                Operation::Build => {
                    if aci.args().clean {
                        aci.clean()?;
                    }
                    aci.build()?;
                }
                Operation::Clean => aci.clean()?,
                Operation::Test => aci.test()?,
            },
        }
        Ok(())
    }
}
