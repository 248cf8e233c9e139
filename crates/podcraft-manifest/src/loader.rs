//! Reading manifests from project directories.

use std::path::Path;

use podcraft_common::constants::{ACI_MANIFEST_FILE, POD_MANIFEST_FILE};
use podcraft_common::error::{PodcraftError, Result};
use serde::de::DeserializeOwned;

use crate::aci::AciManifest;
use crate::pod::PodManifest;
use crate::validator;

/// Loads and validates `<dir>/pod-manifest.yml`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, not valid YAML,
/// or fails validation.
pub fn load_pod_manifest(dir: &Path) -> Result<PodManifest> {
    let manifest: PodManifest = read_yaml(&dir.join(POD_MANIFEST_FILE), "pod manifest")?;
    validator::validate_pod(&manifest)?;
    tracing::info!(pod = %manifest.name, apps = manifest.apps().len(), "loaded pod manifest");
    Ok(manifest)
}

/// Loads and validates `<dir>/aci-manifest.yml`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, not valid YAML,
/// or fails validation.
pub fn load_aci_manifest(dir: &Path) -> Result<AciManifest> {
    let manifest: AciManifest = read_yaml(&dir.join(ACI_MANIFEST_FILE), "aci manifest")?;
    validator::validate_aci(&manifest)?;
    tracing::info!(aci = %manifest.name, "loaded aci manifest");
    Ok(manifest)
}

fn read_yaml<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T> {
    if !path.is_file() {
        return Err(PodcraftError::NotFound {
            kind,
            id: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| PodcraftError::io(path, e))?;
    serde_yaml::from_str(&content).map_err(|e| PodcraftError::Manifest {
        path: path.to_path_buf(),
        source: e,
    })
}
