//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode file (JPEG, PNG, TIFF, WebP, BMP, GIF) | `image::ImageReader` with content sniffing |
//! | Decode buffer | `image::load_from_memory` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality honoured, alpha dropped) |
//! | Encode → PNG/TIFF/BMP/WebP | `DynamicImage::write_to` |

use super::backend::{BackendError, ImageBackend};
use super::params::{OutputFormat, ResizeParams, SaveParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Extensions whose decoders are compiled in.
const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp", "gif"];

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    INPUT_EXTENSIONS
}

/// Backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `img` into memory. Nothing touches the output path until the
/// encoder has succeeded, so a failed encode leaves no partial file.
fn encode(img: &DynamicImage, params: &SaveParams) -> Result<Vec<u8>, BackendError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoded = match params.format {
        OutputFormat::Jpeg => {
            // Quality's field is public, so out-of-range values can get here
            let quality = params.quality.value().clamp(1, 100) as u8;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        OutputFormat::Png => img.write_to(&mut buffer, ImageFormat::Png),
        OutputFormat::Tiff => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, ImageFormat::Tiff)
        }
        OutputFormat::Bmp => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, ImageFormat::Bmp)
        }
        OutputFormat::Webp => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, ImageFormat::WebP)
        }
    };
    encoded.map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "{} encode of {} failed: {}",
            params.format,
            params.output.display(),
            e
        ))
    })?;
    Ok(buffer.into_inner())
}

impl ImageBackend for RustBackend {
    fn decode_file(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e)))
    }

    fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes)
            .map_err(|e| BackendError::Decode(format!("Failed to decode buffer: {}", e)))
    }

    fn resize(
        &self,
        image: &DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "cannot resize to {}x{}",
                params.width, params.height
            )));
        }
        Ok(image.resize_exact(params.width, params.height, FilterType::Lanczos3))
    }

    fn save(&self, image: &DynamicImage, params: &SaveParams) -> Result<(), BackendError> {
        let bytes = encode(image, params)?;
        std::fs::write(&params.output, bytes).map_err(BackendError::Io)
    }
}
