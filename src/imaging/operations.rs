//! High-level image operations.
//!
//! These functions combine calculations with backend execution. Every call
//! into the backend that touches pixels goes through [`guarded`], so a panic
//! inside a decoder or encoder becomes an ordinary
//! [`ThumbnailError::Internal`] instead of taking down the caller.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_target_dimensions;
use super::params::ResizeParams;
use crate::dimension::DimensionSpec;
use crate::error::ThumbnailError;
use crate::source::Image;
use image::DynamicImage;
use log::{debug, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run a backend call, converting a panic into [`ThumbnailError::Internal`].
pub(crate) fn guarded<T>(
    what: &str,
    op: impl FnOnce() -> Result<T, BackendError>,
) -> Result<T, ThumbnailError> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result.map_err(ThumbnailError::from),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("recovered from panic during {what}: {message}");
            Err(ThumbnailError::Internal(format!("{what}: {message}")))
        }
    }
}

/// Plan the concrete output size for `spec` against the image's current pixels.
///
/// Sizes past the limits in [`calculations`](super::calculations) fail with
/// [`ThumbnailError::OutputTooLarge`] so the backend never attempts the
/// allocation.
pub fn plan_resize(image: &Image, spec: &DimensionSpec) -> Result<ResizeParams, ThumbnailError> {
    let pixels = image.pixels()?;
    let directive = spec.directive()?;
    let (width, height) = calculate_target_dimensions((pixels.width(), pixels.height()), directive)
        .ok_or_else(|| ThumbnailError::OutputTooLarge(spec.label()))?;
    Ok(ResizeParams { width, height })
}

/// Resize `image` according to `spec`, returning new pixels.
///
/// Fails with [`ThumbnailError::InvalidImageData`] when the image has no
/// pixels and [`ThumbnailError::NoTransformSpecified`] when the spec sets no
/// usable size. The image itself is left untouched.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    image: &Image,
    spec: &DimensionSpec,
) -> Result<DynamicImage, ThumbnailError> {
    let params = plan_resize(image, spec)?;
    let pixels = image.pixels()?;
    debug!(
        "resizing {} from {}x{} to {}x{}",
        image.path.display(),
        pixels.width(),
        pixels.height(),
        params.width,
        params.height
    );
    guarded("resize", || backend.resize(pixels, &params))
}
