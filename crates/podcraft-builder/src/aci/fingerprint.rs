//! SHA-256 fingerprint of an image's inputs.
//!
//! A build is skipped when the fingerprint of the manifest and the source
//! root filesystem matches the one recorded by the previous build.

use std::io::Read;
use std::path::Path;

use podcraft_common::error::{PodcraftError, Result};
use podcraft_manifest::AciManifest;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Computes the fingerprint of a manifest and an optional rootfs directory.
///
/// Entries are visited in file-name order, so the result only depends on
/// paths, file contents, and symlink targets.
///
/// # Errors
///
/// Returns an error if the manifest cannot be serialized or the rootfs
/// cannot be read.
pub fn compute(manifest: &AciManifest, rootfs: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(manifest)?);

    if rootfs.is_dir() {
        for entry in WalkDir::new(rootfs).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(rootfs, e))?;
            let relative = entry.path().strip_prefix(rootfs).unwrap_or(entry.path());
            hasher.update(relative.to_string_lossy().as_bytes());
            hasher.update([0]);

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                let link = std::fs::read_link(entry.path())
                    .map_err(|e| PodcraftError::io(entry.path(), e))?;
                hasher.update(b"l");
                hasher.update(link.to_string_lossy().as_bytes());
            } else if file_type.is_file() {
                hasher.update(b"f");
                hash_contents(&mut hasher, entry.path())?;
            } else {
                hasher.update(b"d");
            }
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Reads the fingerprint recorded at `path`, if any.
#[must_use]
pub fn read_recorded(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
}

fn hash_contents(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = std::fs::File::open(path).map_err(|e| PodcraftError::io(path, e))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| PodcraftError::io(path, e))?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buf[..n]);
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> PodcraftError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    PodcraftError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcraft_manifest::AciDefinition;

    fn manifest(name: &str) -> AciManifest {
        AciManifest {
            name: name.parse().expect("name"),
            aci: AciDefinition::default(),
        }
    }

    #[test]
    fn fingerprint_is_stable() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.txt"), "a").expect("write");
        let first = compute(&manifest("api:1"), dir.path()).expect("hash");
        let second = compute(&manifest("api:1"), dir.path()).expect("hash");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "a").expect("write");
        let before = compute(&manifest("api:1"), dir.path()).expect("hash");
        std::fs::write(&file, "b").expect("write");
        let after = compute(&manifest("api:1"), dir.path()).expect("hash");
        assert_ne!(before, after);
    }

    #[test]
    fn fingerprint_changes_with_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let one = compute(&manifest("api:1"), dir.path()).expect("hash");
        let two = compute(&manifest("api:2"), dir.path()).expect("hash");
        assert_ne!(one, two);
    }

    #[test]
    fn missing_rootfs_hashes_manifest_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("rootfs");
        assert!(compute(&manifest("api:1"), &missing).is_ok());
    }

    #[test]
    fn read_recorded_trims_whitespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("image.sha256");
        std::fs::write(&path, "abc\n").expect("write");
        assert_eq!(read_recorded(&path).as_deref(), Some("abc"));
        assert_eq!(read_recorded(&dir.path().join("missing")), None);
    }
}
