//! Domain primitive types used across the podcraft workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PodcraftError, Result};

/// Full name of an application container image: `name[:version]`.
///
/// Names look like `example.com/pod-web:1.0.0`. The version is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AciName {
    name: String,
    version: Option<String>,
}

impl AciName {
    /// Creates a name from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains whitespace, or if
    /// the version is present but empty.
    pub fn new(name: impl Into<String>, version: Option<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(PodcraftError::Config {
                message: format!("invalid image name: {name:?}"),
            });
        }
        if version.as_deref().is_some_and(str::is_empty) {
            return Err(PodcraftError::Config {
                message: format!("empty version in image name {name:?}"),
            });
        }
        Ok(Self { name, version })
    }

    /// Returns the name without the version.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the last path segment of the name (`pod-web` for
    /// `example.com/pod-web`).
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

impl FromStr for AciName {
    type Err = PodcraftError;

    fn from_str(s: &str) -> Result<Self> {
        // The version separator is the last colon after the final slash, so
        // registry ports (`host:5000/app`) stay part of the name.
        let last_segment = s.rfind('/').map_or(0, |i| i + 1);
        match s[last_segment..].rfind(':') {
            Some(i) => {
                let split = last_segment + i;
                Self::new(&s[..split], Some(s[split + 1..].to_string()))
            }
            None => Self::new(s, None),
        }
    }
}

impl TryFrom<String> for AciName {
    type Error = PodcraftError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AciName> for String {
    fn from(value: AciName) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AciName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{version}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Lifecycle operation applied to a pod or one of its apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Assemble the image.
    Build,
    /// Remove build output.
    Clean,
    /// Run the image's tests.
    Test,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Clean => write!(f, "clean"),
            Self::Test => write!(f, "test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_with_version() {
        let name: AciName = "example.com/pod-web:1.0.0".parse().expect("parse");
        assert_eq!(name.name(), "example.com/pod-web");
        assert_eq!(name.version(), Some("1.0.0"));
        assert_eq!(name.short_name(), "pod-web");
    }

    #[test]
    fn parse_name_without_version() {
        let name: AciName = "web".parse().expect("parse");
        assert_eq!(name.name(), "web");
        assert_eq!(name.version(), None);
        assert_eq!(name.to_string(), "web");
    }

    #[test]
    fn parse_keeps_registry_port_in_name() {
        let name: AciName = "registry:5000/base".parse().expect("parse");
        assert_eq!(name.name(), "registry:5000/base");
        assert_eq!(name.version(), None);
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!("".parse::<AciName>().is_err());
        assert!(":1".parse::<AciName>().is_err());
        assert!("web:".parse::<AciName>().is_err());
        assert!("my app".parse::<AciName>().is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let name: AciName = "example.com/base:2".parse().expect("parse");
        let json = serde_json::to_string(&name).expect("serialize");
        assert_eq!(json, "\"example.com/base:2\"");
        let back: AciName = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, name);
    }

    #[test]
    fn operation_display_is_lowercase() {
        assert_eq!(Operation::Build.to_string(), "build");
        assert_eq!(Operation::Clean.to_string(), "clean");
        assert_eq!(Operation::Test.to_string(), "test");
    }
}
