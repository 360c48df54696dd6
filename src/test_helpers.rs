//! Shared test utilities.
//!
//! Synthetic images are generated with the `image` crate so tests need no
//! binary fixtures. The pixels form a gradient, which keeps encoders from
//! collapsing them into a trivially small file.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = tmp.path().join("photo.jpg");
//! create_test_jpeg(&path, 200, 150);
//! ```

use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::Path;

/// A `width` x `height` RGB gradient.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

fn write_test_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, format)
        .unwrap();
}

/// Write a JPEG test image, creating parent directories.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    write_test_image(path, width, height, ImageFormat::Jpeg);
}

/// Write a PNG test image, creating parent directories.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    write_test_image(path, width, height, ImageFormat::Png);
}
