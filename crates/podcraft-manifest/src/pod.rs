//! Pod manifest: a named, ordered group of apps built together.

use podcraft_common::types::AciName;
use serde::{Deserialize, Serialize};

use crate::aci::{AppDefinition, NameValue};

/// One app declared by a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeApp {
    /// App name, also the name of its source directory inside the pod.
    pub name: String,
    /// Images the app image is layered on.
    #[serde(default)]
    pub dependencies: Vec<AciName>,
    /// Process definition of the app.
    #[serde(default)]
    pub app: Option<AppDefinition>,
    /// Free-form annotations.
    #[serde(default)]
    pub annotations: Vec<NameValue>,
}

/// Pod-level declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodDefinition {
    /// Apps in declaration order.
    pub apps: Vec<RuntimeApp>,
    /// Free-form annotations.
    pub annotations: Vec<NameValue>,
}

/// Manifest of a pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodManifest {
    /// Full name of the pod.
    pub name: AciName,
    /// Pod definition.
    #[serde(default)]
    pub pod: PodDefinition,
}

impl PodManifest {
    /// Returns the apps in declaration order.
    #[must_use]
    pub fn apps(&self) -> &[RuntimeApp] {
        &self.pod.apps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_keeps_declaration_order() {
        let yaml = r"
name: example.com/web:1
pod:
  apps:
    - name: worker
    - name: api
      dependencies: [example.com/base:1]
";
        let manifest: PodManifest = serde_yaml::from_str(yaml).expect("parse");
        let names: Vec<&str> = manifest.apps().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["worker", "api"]);
        assert_eq!(manifest.apps()[1].dependencies.len(), 1);
    }

    #[test]
    fn deserialize_without_pod_block_has_no_apps() {
        let manifest: PodManifest = serde_yaml::from_str("name: web\n").expect("parse");
        assert!(manifest.apps().is_empty());
    }
}
