//! Semantic validation of parsed manifests.
//!
//! Checks app names, duplicate apps, and process definitions before any
//! path is derived from a manifest.

use std::collections::HashSet;

use podcraft_common::error::{PodcraftError, Result};

use crate::aci::{AciManifest, AppDefinition};
use crate::pod::PodManifest;

/// Validates a pod manifest.
///
/// # Checks performed
///
/// 1. Every app name is a single safe path component.
/// 2. No two apps share a name.
/// 3. Apps that declare a process have a non-empty `exec`.
///
/// # Errors
///
/// Returns an error if any check fails.
pub fn validate_pod(manifest: &PodManifest) -> Result<()> {
    tracing::debug!(pod = %manifest.name, "validating pod manifest");
    let mut seen = HashSet::new();
    for app in manifest.apps() {
        validate_app_name(&app.name)?;
        if !seen.insert(app.name.as_str()) {
            return Err(PodcraftError::Config {
                message: format!("duplicate app name in pod {}: {:?}", manifest.name, app.name),
            });
        }
        if let Some(definition) = &app.app {
            check_exec(&app.name, definition)?;
        }
    }
    Ok(())
}

/// Validates an app manifest.
///
/// # Errors
///
/// Returns an error if the app declares a process with an empty `exec`.
pub fn validate_aci(manifest: &AciManifest) -> Result<()> {
    tracing::debug!(aci = %manifest.name, "validating aci manifest");
    if let Some(definition) = &manifest.aci.app {
        check_exec(manifest.name.name(), definition)?;
    }
    Ok(())
}

/// Checks that an app name is a single path component that can also be
/// appended to the pod's image name.
///
/// # Errors
///
/// Returns an error if the name is empty, `.` or `..`, contains a path
/// separator or NUL byte, or contains whitespace or the `:` version
/// separator.
pub fn validate_app_name(name: &str) -> Result<()> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(PodcraftError::Config {
            message: format!("app name {name:?} is not a single path component"),
        });
    }
    if name.contains(':') || name.chars().any(char::is_whitespace) {
        return Err(PodcraftError::Config {
            message: format!("app name {name:?} cannot be part of an image name"),
        });
    }
    Ok(())
}

fn check_exec(app: &str, definition: &AppDefinition) -> Result<()> {
    if definition.exec.is_empty() || definition.exec[0].trim().is_empty() {
        return Err(PodcraftError::Config {
            message: format!("app {app:?} declares a process with an empty exec"),
        });
    }
    Ok(())
}
