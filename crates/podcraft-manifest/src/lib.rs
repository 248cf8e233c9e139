//! # podcraft-manifest
//!
//! Declarative descriptions of pods and application container images.
//!
//! Handles:
//! - **Pod**: the pod manifest and its ordered list of apps.
//! - **Aci**: the per-app manifest consumed by the image builder.
//! - **Loader**: reading YAML manifests from a project directory.
//! - **Validator**: semantic checks, including path-safe app names.
//! - **Translate**: projection of a pod app entry into an app manifest.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod aci;
pub mod loader;
pub mod pod;
pub mod translate;
pub mod validator;

pub use aci::{AciDefinition, AciManifest, AppDefinition, NameValue};
pub use loader::{load_aci_manifest, load_pod_manifest};
pub use pod::{PodDefinition, PodManifest, RuntimeApp};
pub use translate::to_aci_manifest;
