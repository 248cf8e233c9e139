//! Image directory assembly and packaging.
//!
//! Packaged images are gzip-compressed tarballs of the assembled image
//! directory, with entries relative to the image root.

use std::path::Path;

use podcraft_common::error::{PodcraftError, Result};
use walkdir::WalkDir;

/// Recursively copies `source` into `dest`, creating `dest` if needed.
///
/// Symlinks are recreated as symlinks on Unix and skipped elsewhere.
///
/// # Errors
///
/// Returns an error if any entry cannot be read or written.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<u64> {
    tracing::debug!(source = %source.display(), dest = %dest.display(), "copying tree");
    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            PodcraftError::Io {
                path,
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            }
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| PodcraftError::io(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            let _ = std::fs::copy(entry.path(), &target)
                .map_err(|e| PodcraftError::io(entry.path(), e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = std::fs::read_link(link).map_err(|e| PodcraftError::io(link, e))?;
    std::os::unix::fs::symlink(&points_to, target).map_err(|e| PodcraftError::io(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> Result<()> {
    tracing::warn!(path = %link.display(), "skipping symlink on this platform");
    Ok(())
}

/// Packages the `image` directory as a gzip-compressed tarball at `archive`.
///
/// # Errors
///
/// Returns an error if the archive cannot be written.
pub fn package(image: &Path, archive: &Path) -> Result<u64> {
    tracing::info!(
        image = %image.display(),
        archive = %archive.display(),
        "packaging image"
    );
    let file = std::fs::File::create(archive).map_err(|e| PodcraftError::io(archive, e))?;
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder
        .append_dir_all(".", image)
        .map_err(|e| PodcraftError::io(image, e))?;
    let encoder = builder
        .into_inner()
        .map_err(|e| PodcraftError::io(archive, e))?;
    let _ = encoder.finish().map_err(|e| PodcraftError::io(archive, e))?;

    let size = std::fs::metadata(archive)
        .map_err(|e| PodcraftError::io(archive, e))?
        .len();
    tracing::info!(size, "image packaged");
    Ok(size)
}
