//! Source images: decoded pixels plus where they came from.
//!
//! An [`Image`] is owned by whoever loaded it. The generator replaces its
//! pixels in place as each output is produced (see
//! [`ResizeFrom`](crate::config::ResizeFrom)), but `size` is a snapshot taken at
//! load time and is never recomputed.

use crate::error::ThumbnailError;
use crate::imaging::{Dimensions, ImageBackend};
use image::DynamicImage;
use log::warn;
use std::path::{Path, PathBuf};

/// A loaded image and information about it.
#[derive(Debug, Clone, Default)]
pub struct Image {
    /// Where the image was loaded from. Empty for in-memory images.
    pub path: PathBuf,
    /// Decoded pixels. `None` means there is nothing to resize or save.
    pub pixels: Option<DynamicImage>,
    /// Size measured when the image was loaded.
    pub size: Dimensions,
}

impl Image {
    /// Wrap already-decoded pixels, measuring their size.
    pub fn from_pixels(path: impl Into<PathBuf>, pixels: DynamicImage) -> Self {
        Self {
            path: path.into(),
            size: Dimensions::of(&pixels),
            pixels: Some(pixels),
        }
    }

    /// Borrow the pixels, failing when there are none.
    pub fn pixels(&self) -> Result<&DynamicImage, ThumbnailError> {
        self.pixels.as_ref().ok_or(ThumbnailError::InvalidImageData)
    }

    /// Dimensions of the current pixels, which may differ from `size` once
    /// the generator has replaced them.
    pub fn current_size(&self) -> Option<Dimensions> {
        self.pixels.as_ref().map(Dimensions::of)
    }
}

/// Open and decode an image file.
///
/// Open and decode failures propagate unchanged.
pub fn load_from_path(backend: &impl ImageBackend, path: &Path) -> Result<Image, ThumbnailError> {
    let pixels = backend.decode_file(path)?;
    Ok(Image::from_pixels(path, pixels))
}

/// Open `path`, trying `fallback` if that fails.
///
/// When both fail, or no fallback is given, the error from `path` is returned.
pub fn load_from_path_with_fallback(
    backend: &impl ImageBackend,
    path: &Path,
    fallback: Option<&Path>,
) -> Result<Image, ThumbnailError> {
    let primary_err = match load_from_path(backend, path) {
        Ok(image) => return Ok(image),
        Err(e) => e,
    };

    let Some(fallback) = fallback.filter(|p| !p.as_os_str().is_empty()) else {
        return Err(primary_err);
    };

    warn!(
        "failed to open {}: {}; trying fallback {}",
        path.display(),
        primary_err,
        fallback.display()
    );
    load_from_path(backend, fallback).map_err(|fallback_err| {
        warn!("fallback {} also failed: {}", fallback.display(), fallback_err);
        primary_err
    })
}

/// Decode an in-memory encoded image. The result has an empty path.
pub fn load_from_bytes(backend: &impl ImageBackend, bytes: &[u8]) -> Result<Image, ThumbnailError> {
    let pixels = backend.decode_bytes(bytes)?;
    Ok(Image::from_pixels(PathBuf::new(), pixels))
}
