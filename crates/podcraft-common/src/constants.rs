//! File names and on-disk layout shared by the workspace.

/// Manifest file describing a pod and its apps.
pub const POD_MANIFEST_FILE: &str = "pod-manifest.yml";

/// Manifest file describing a single application container image.
pub const ACI_MANIFEST_FILE: &str = "aci-manifest.yml";

/// Directory created under a project when no target path is given.
pub const DEFAULT_TARGET_DIR: &str = "target";

/// Source directory holding the app's root filesystem.
pub const ROOTFS_DIR: &str = "rootfs";

/// Source directory holding the app's test scripts.
pub const TESTS_DIR: &str = "tests";

/// Extension of test scripts run by `test`.
pub const TEST_SCRIPT_EXTENSION: &str = "sh";

/// Assembled image directory under an app's target.
pub const IMAGE_DIR: &str = "image";

/// Image manifest written inside the assembled image.
pub const IMAGE_MANIFEST_FILE: &str = "manifest";

/// Build metadata written next to the assembled image.
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Content fingerprint of the last successful build.
pub const FINGERPRINT_FILE: &str = "image.sha256";

/// Resolved pod manifest written at the end of a pod build.
pub const POD_OUTPUT_FILE: &str = "pod-manifest.json";

/// Extension of packaged images.
pub const ACI_EXTENSION: &str = ".aci";

/// Separator between the pod name and the app name in app image names.
pub const POD_APP_SEPARATOR: char = '_';
