//! Thumbnail generation: one source image in, one file per dimension out.
//!
//! A [`Generator`] owns a [`GeneratorConfig`] and an [`ImageBackend`]. Its
//! [`generate`](Generator::generate) call walks the configured dimension list
//! in order and records a [`GenerationResult`] for every entry, failed or
//! not. A failing entry never stops its siblings; the only whole-call failure
//! is an empty dimension list.
//!
//! ## Pixel chaining
//!
//! With [`ResizeFrom::Previous`] (the default) each variant is resized from
//! the pixels of the variant before it, and the caller's [`Image`] holds the
//! last produced pixels afterwards:
//!
//! ```text
//! source 4000x3000 ──▶ 1600x1200 ──▶ 800x600 ──▶ 200x150
//! ```
//!
//! List dimensions from largest to smallest in this mode. With
//! [`ResizeFrom::Original`] every variant is resized from an untouched copy of
//! the source and the caller's image is never modified.

use crate::config::{GeneratorConfig, ResizeFrom};
use crate::dimension::DimensionSpec;
use crate::error::ThumbnailError;
use crate::imaging::{ImageBackend, RustBackend, SaveParams, create_thumbnail};
use crate::naming::resolve_output_path;
use crate::persist::{save_raw, save_with_retry};
use crate::source::{self, Image};
use image::DynamicImage;
use log::{debug, warn};
use std::path::Path;

pub use crate::persist::GenerationResult;

/// Produces thumbnails according to a [`GeneratorConfig`].
pub struct Generator<B: ImageBackend = RustBackend> {
    config: GeneratorConfig,
    backend: B,
}

impl Generator<RustBackend> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_backend(config, RustBackend::new())
    }
}

impl Default for Generator<RustBackend> {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl<B: ImageBackend> Generator<B> {
    pub fn with_backend(config: GeneratorConfig, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// A generator writing into `subdir` below this one's destination.
    ///
    /// Used to mirror a source tree under the destination. Destination
    /// overrides on dimension specs are full paths and stay untouched.
    pub fn in_subdirectory(&self, subdir: &Path) -> Self
    where
        B: Clone,
    {
        let mut config = self.config.clone();
        config.destination = config.destination.join(subdir);
        Self::with_backend(config, self.backend.clone())
    }

    /// The configured target size as an exact-size spec.
    pub fn default_dimension(&self) -> DimensionSpec {
        DimensionSpec::exact(self.config.target.width, self.config.target.height)
    }

    /// The configured default percentage as a spec.
    pub fn default_percentage_dimension(&self) -> DimensionSpec {
        DimensionSpec::percentage(self.config.target.percentage)
    }

    pub fn open(&self, path: &Path) -> Result<Image, ThumbnailError> {
        source::load_from_path(&self.backend, path)
    }

    pub fn open_with_fallback(
        &self,
        path: &Path,
        fallback: Option<&Path>,
    ) -> Result<Image, ThumbnailError> {
        source::load_from_path_with_fallback(&self.backend, path, fallback)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Image, ThumbnailError> {
        source::load_from_bytes(&self.backend, bytes)
    }

    /// Resize `image` for `spec` without saving or modifying it.
    pub fn processed_image(
        &self,
        image: &Image,
        spec: &DimensionSpec,
    ) -> Result<DynamicImage, ThumbnailError> {
        create_thumbnail(&self.backend, image, spec)
    }

    /// Save the image's current pixels under generator-level naming only.
    pub fn save(&self, image: &Image) -> Result<GenerationResult, ThumbnailError> {
        self.save_with_dimension(image, &DimensionSpec::default())
    }

    /// Save the image's current pixels, named by `spec`'s overrides.
    ///
    /// Only the naming fields of `spec` are used; the pixels are written as
    /// they are.
    pub fn save_with_dimension(
        &self,
        image: &Image,
        spec: &DimensionSpec,
    ) -> Result<GenerationResult, ThumbnailError> {
        let pixels = image.pixels()?;
        let location =
            resolve_output_path(&self.config, image, spec).ok_or(ThumbnailError::MissingFilename)?;

        save_with_retry(
            &self.backend,
            pixels,
            &SaveParams {
                output: location.path.clone(),
                format: self.config.encoding.format,
                quality: self.config.encoding.quality,
            },
        )?;
        debug!("wrote {}", location.path.display());
        Ok(GenerationResult::saved(location.filename, location.path))
    }

    /// Save arbitrary pixels to an explicit path in the configured encoding.
    pub fn save_to(
        &self,
        pixels: Option<&DynamicImage>,
        path: &Path,
    ) -> Result<GenerationResult, ThumbnailError> {
        save_raw(
            &self.backend,
            pixels,
            path,
            self.config.encoding.format,
            self.config.encoding.quality,
        )
    }

    /// Produce every configured dimension for `image`.
    ///
    /// Returns one result per dimension, in configured order. Fails only when
    /// no dimensions are configured.
    pub fn generate(&self, image: &mut Image) -> Result<Vec<GenerationResult>, ThumbnailError> {
        if self.config.dimensions.is_empty() {
            return Err(ThumbnailError::NoTransformSpecified);
        }

        let mut results = Vec::with_capacity(self.config.dimensions.len());
        for spec in &self.config.dimensions {
            let outcome = match self.config.resize_from {
                ResizeFrom::Previous => self.produce(image, spec),
                ResizeFrom::Original => self.produce(&mut image.clone(), spec),
            };
            let result = outcome.unwrap_or_else(|e| {
                warn!(
                    "{} [{}]: {}",
                    image.path.display(),
                    spec.label(),
                    e
                );
                GenerationResult::failed(&image.path, e)
            });
            results.push(result);
        }
        Ok(results)
    }

    fn produce(
        &self,
        image: &mut Image,
        spec: &DimensionSpec,
    ) -> Result<GenerationResult, ThumbnailError> {
        let pixels = self.processed_image(image, spec)?;
        image.pixels = Some(pixels);
        self.save_with_dimension(image, spec)
    }
}
