//! Per-app image manifest consumed by the image builder.

use podcraft_common::types::AciName;
use serde::{Deserialize, Serialize};

/// A named string value (environment variable, annotation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    /// Entry name.
    pub name: String,
    /// Entry value.
    pub value: String,
}

/// Process the image runs when started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppDefinition {
    /// Command line of the app process.
    pub exec: Vec<String>,
    /// User the process runs as.
    pub user: Option<String>,
    /// Group the process runs as.
    pub group: Option<String>,
    /// Environment of the process.
    pub environment: Vec<NameValue>,
    /// Working directory of the process.
    pub working_directory: Option<String>,
}

/// Image-level declarations of an app manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AciDefinition {
    /// Process definition, absent for base images.
    pub app: Option<AppDefinition>,
    /// Images this image is layered on.
    pub dependencies: Vec<AciName>,
    /// Free-form annotations.
    pub annotations: Vec<NameValue>,
    /// Paths kept from dependencies; empty keeps everything.
    pub path_whitelist: Vec<String>,
}

/// Manifest of a single application container image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AciManifest {
    /// Full name of the image.
    pub name: AciName,
    /// Image definition.
    #[serde(default)]
    pub aci: AciDefinition,
}

impl AciManifest {
    /// Returns a file-system friendly name for the image
    /// (`pod-web_api-1.0.0` for `example.com/pod-web_api:1.0.0`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        match self.name.version() {
            Some(version) => format!("{}-{version}", self.name.short_name()),
            None => self.name.short_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_manifest() {
        let yaml = "name: example.com/base:1\n";
        let manifest: AciManifest = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(manifest.name.to_string(), "example.com/base:1");
        assert!(manifest.aci.app.is_none());
        assert!(manifest.aci.dependencies.is_empty());
    }

    #[test]
    fn deserialize_app_uses_camel_case() {
        let yaml = r"
name: example.com/api:2
aci:
  app:
    exec: [/bin/api, --port, '8080']
    workingDirectory: /srv
    environment:
      - name: RUST_LOG
        value: info
  pathWhitelist: [/bin]
";
        let manifest: AciManifest = serde_yaml::from_str(yaml).expect("parse");
        let app = manifest.aci.app.expect("app block");
        assert_eq!(app.exec, vec!["/bin/api", "--port", "8080"]);
        assert_eq!(app.working_directory.as_deref(), Some("/srv"));
        assert_eq!(app.environment[0].name, "RUST_LOG");
        assert_eq!(manifest.aci.path_whitelist, vec!["/bin"]);
    }

    #[test]
    fn file_stem_uses_short_name_and_version() {
        let manifest = AciManifest {
            name: "example.com/pod-web_api:1.0.0".parse().expect("name"),
            aci: AciDefinition::default(),
        };
        assert_eq!(manifest.file_stem(), "pod-web_api-1.0.0");
    }
}
