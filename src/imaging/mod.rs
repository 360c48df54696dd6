//! Image processing on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `ImageReader::with_guessed_format` / `load_from_memory` |
//! | **Resize** | `resize_exact` with Lanczos3 |
//! | **Encode JPEG** | `JpegEncoder::new_with_quality` |
//! | **Encode PNG / TIFF / BMP / WebP** | `DynamicImage::write_to` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{MAX_EDGE, MAX_PIXELS, calculate_target_dimensions};
pub use operations::{create_thumbnail, plan_resize};
pub use params::{OutputFormat, Quality, ResizeDirective, ResizeParams, SaveParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
