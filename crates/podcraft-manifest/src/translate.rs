//! Projection of a pod's app entry into the manifest of its image.

use podcraft_common::constants::POD_APP_SEPARATOR;
use podcraft_common::error::Result;
use podcraft_common::types::AciName;

use crate::aci::{AciDefinition, AciManifest};
use crate::pod::RuntimeApp;
use crate::validator::validate_app_name;

/// Derives the image manifest of `entry`, an app of the pod named `pod`.
///
/// The image is named `<pod>_<app>` and carries the pod's version. The
/// app's process, dependencies, and annotations are copied as declared.
/// This function has no side effects: equal inputs give equal manifests.
///
/// # Errors
///
/// Returns an error if the app name cannot form an image name.
pub fn to_aci_manifest(pod: &AciName, entry: &RuntimeApp) -> Result<AciManifest> {
    Ok(AciManifest {
        name: app_image_name(pod, &entry.name)?,
        aci: AciDefinition {
            app: entry.app.clone(),
            dependencies: entry.dependencies.clone(),
            annotations: entry.annotations.clone(),
            path_whitelist: Vec::new(),
        },
    })
}

fn app_image_name(pod: &AciName, app: &str) -> Result<AciName> {
    validate_app_name(app)?;
    let name = format!("{}{POD_APP_SEPARATOR}{app}", pod.name());
    AciName::new(name, pod.version().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aci::{AppDefinition, NameValue};

    fn entry() -> RuntimeApp {
        RuntimeApp {
            name: "api".into(),
            dependencies: vec!["example.com/base:1".parse().expect("dep")],
            app: Some(AppDefinition {
                exec: vec!["/bin/api".into()],
                ..AppDefinition::default()
            }),
            annotations: vec![NameValue {
                name: "owner".into(),
                value: "platform".into(),
            }],
        }
    }

    #[test]
    fn name_combines_pod_and_app() {
        let pod: AciName = "example.com/web:1.2".parse().expect("name");
        let manifest = to_aci_manifest(&pod, &entry()).expect("manifest");
        assert_eq!(manifest.name.to_string(), "example.com/web_api:1.2");
    }

    #[test]
    fn declarations_are_copied() {
        let pod: AciName = "web".parse().expect("name");
        let manifest = to_aci_manifest(&pod, &entry()).expect("manifest");
        assert_eq!(manifest.aci.app, entry().app);
        assert_eq!(manifest.aci.dependencies, entry().dependencies);
        assert_eq!(manifest.aci.annotations, entry().annotations);
        assert!(manifest.aci.path_whitelist.is_empty());
    }

    #[test]
    fn distinct_apps_get_distinct_names() {
        let pod: AciName = "web".parse().expect("name");
        let mut worker = entry();
        worker.name = "worker".into();
        let api = to_aci_manifest(&pod, &entry()).expect("api");
        let worker = to_aci_manifest(&pod, &worker).expect("worker");
        assert_ne!(api.name, worker.name);
    }

    #[test]
    fn unusable_app_name_is_an_error() {
        let pod: AciName = "web".parse().expect("name");
        for name in ["my api", "a:b"] {
            let mut bad = entry();
            bad.name = name.into();
            assert!(to_aci_manifest(&pod, &bad).is_err(), "accepted {name:?}");
        }
    }

    #[test]
    fn projection_is_repeatable() {
        let pod: AciName = "example.com/web:1".parse().expect("name");
        let app = entry();
        assert_eq!(
            to_aci_manifest(&pod, &app).expect("first"),
            to_aci_manifest(&pod, &app).expect("second")
        );
    }
}
