//! Build configuration shared by every unit of a run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Flags controlling how every build unit in a run behaves.
///
/// A `BuildArgs` is assembled once (usually by the CLI) and then frozen:
/// the pod wraps it in an `Arc` and hands the same value to every app it
/// builds, so all apps of a pod follow the same policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArgs {
    /// Package the built image as a compressed archive.
    pub zip: bool,
    /// Run a clean pass before building.
    pub clean: bool,
    /// Rebuild even when the cached image is up to date.
    pub force_update: bool,
    /// Source root of the build.
    pub path: PathBuf,
    /// Output root for build artifacts. Defaults to `<path>/target`.
    pub target_path: Option<PathBuf>,
}

impl BuildArgs {
    /// Creates arguments for the given source root with every flag off.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Resolves the output root for a project rooted at `project`.
    #[must_use]
    pub fn resolve_target(&self, project: &Path) -> PathBuf {
        self.target_path
            .clone()
            .unwrap_or_else(|| project.join(crate::constants::DEFAULT_TARGET_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_all_flags_disabled() {
        let args = BuildArgs::new("/src/web");
        assert!(!args.zip);
        assert!(!args.clean);
        assert!(!args.force_update);
        assert_eq!(args.path, PathBuf::from("/src/web"));
        assert!(args.target_path.is_none());
    }

    #[test]
    fn resolve_target_defaults_under_project() {
        let args = BuildArgs::new("/src/web");
        assert_eq!(
            args.resolve_target(Path::new("/src/web")),
            PathBuf::from("/src/web/target")
        );
    }

    #[test]
    fn resolve_target_prefers_explicit_path() {
        let args = BuildArgs {
            target_path: Some(PathBuf::from("/out/web")),
            ..BuildArgs::new("/src/web")
        };
        assert_eq!(
            args.resolve_target(Path::new("/src/web")),
            PathBuf::from("/out/web")
        );
    }
}
