//! # Thumbnailer
//!
//! Generates resized copies ("thumbnails") of a source image at one or more
//! configured dimensions and writes each under a predictable, overridable
//! name.
//!
//! # Pipeline
//!
//! ```text
//! load  ──▶  resize (per dimension)  ──▶  name  ──▶  save
//! source      imaging::operations         naming     persist
//! ```
//!
//! A [`Generator`] runs this pipeline for every entry of its dimension list
//! and returns one [`GenerationResult`] per entry. Failures are recorded per
//! entry instead of aborting the run; see [`generate`] for details.
//!
//! ```no_run
//! use thumbnailer::{DimensionSpec, Generator, GeneratorConfig};
//! use std::path::Path;
//!
//! let config = GeneratorConfig {
//!     dimensions: vec![
//!         DimensionSpec::width(640).with_prefix("md-"),
//!         DimensionSpec::exact(64, 64).with_prefix("sq-"),
//!     ],
//!     ..GeneratorConfig::default()
//! };
//! let generator = Generator::new(config);
//! let mut image = generator.open(Path::new("photos/cat.jpg"))?;
//! for result in generator.generate(&mut image)? {
//!     match &result.error {
//!         None => println!("wrote {}", result.path.display()),
//!         Some(e) => eprintln!("failed: {e}"),
//!     }
//! }
//! # Ok::<(), thumbnailer::ThumbnailError>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Loading images from files (with fallback) or memory |
//! | [`dimension`] | Dimension specs and resize-mode precedence |
//! | [`imaging`] | Resize math, the [`ImageBackend`](imaging::ImageBackend) trait and the `image`-crate backend |
//! | [`naming`] | Output filename and path precedence rules |
//! | [`persist`] | Writing files, with one directory-creating retry |
//! | [`generate`] | The [`Generator`] orchestrating all of the above |
//! | [`config`] | `thumbnailer.toml` loading, merging and validation |
//! | [`scan`] | Expanding CLI source arguments into image files |
//! | [`output`] | CLI output formatting |
//! | [`error`] | [`ThumbnailError`] |
//!
//! # Design Decisions
//!
//! ## Chained Resizes by Default
//!
//! Each variant is resized from the one produced before it, so a list
//! ordered from large to small decodes the source once and resamples ever
//! smaller buffers. Set `resize_from = "original"` when every variant must
//! come from the full-resolution source.
//!
//! ## Partial Failure Over Fail-Fast
//!
//! One broken dimension entry or one unwritable path should not cost the
//! other variants. [`Generator::generate`] only fails as a whole when there
//! is nothing to do.
//!
//! ## Engine Faults Are Errors
//!
//! Decoders and encoders are third-party code running on untrusted input.
//! Panics raised while resizing or saving are caught at the backend boundary
//! and reported as [`ThumbnailError::Internal`].

pub mod config;
pub mod dimension;
pub mod error;
pub mod generate;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod persist;
pub mod scan;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{GeneratorConfig, ResizeFrom};
pub use dimension::DimensionSpec;
pub use error::ThumbnailError;
pub use generate::{GenerationResult, Generator};
pub use source::Image;
