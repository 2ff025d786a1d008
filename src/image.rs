use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

/// ROM size of the target machine (8 KiB).
pub const DEFAULT_IMAGE_SIZE: usize = 0x2000;

/// Value of unused ROM space.
pub const IMAGE_FILL: u8 = 0xff;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("ROM size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltImage {
    pub path: PathBuf,
    pub program_len: usize,
    pub image_size: usize,
}

/// Lays `program` out at address 0 and fills the rest of the image with `IMAGE_FILL`.
///
/// # Errors
/// Returns `ImageError::SizeMismatch` when the result is not exactly `image_size` bytes.
pub fn assemble_image(program: &[u8], image_size: usize) -> Result<Vec<u8>, ImageError> {
    let Some(fill_len) = image_size.checked_sub(program.len()) else {
        return Err(ImageError::SizeMismatch {
            expected: image_size,
            actual: program.len(),
        });
    };
    let mut image = Vec::with_capacity(image_size);
    image.extend_from_slice(program);
    image.resize(program.len() + fill_len, IMAGE_FILL);

    if image.len() != image_size {
        return Err(ImageError::SizeMismatch {
            expected: image_size,
            actual: image.len(),
        });
    }
    Ok(image)
}

/// Builds the image for `program` and stores it at `destination`, replacing any
/// existing file.
///
/// The bytes go to a temporary sibling first and are renamed into place, so the
/// destination either holds the whole image or is left untouched.
///
/// # Errors
/// Returns `ImageError::SizeMismatch` before touching the filesystem when the
/// program does not fit, and `ImageError::Io` when the write or rename fails.
pub fn build_image(
    program: &[u8],
    destination: &Path,
    image_size: usize,
) -> Result<BuiltImage, ImageError> {
    let image = assemble_image(program, image_size)?;
    debug!(
        "{}: {} program bytes, {} fill bytes",
        destination.display(),
        program.len(),
        image_size - program.len()
    );

    let staging = staging_path(destination);
    if let Err(source) = std::fs::write(&staging, &image) {
        discard_staging(&staging);
        return Err(ImageError::Io {
            path: destination.to_path_buf(),
            source,
        });
    }
    if let Err(source) = std::fs::rename(&staging, destination) {
        discard_staging(&staging);
        return Err(ImageError::Io {
            path: destination.to_path_buf(),
            source,
        });
    }

    Ok(BuiltImage {
        path: destination.to_path_buf(),
        program_len: program.len(),
        image_size,
    })
}

fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    destination.with_file_name(format!(".{name}.partial"))
}

fn discard_staging(staging: &Path) {
    if !staging.exists() {
        return;
    }
    if let Err(err) = std::fs::remove_file(staging) {
        warn!("could not remove {}: {err}", staging.display());
    }
}
