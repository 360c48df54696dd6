//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the resize-engine capability the rest of the
//! crate consumes: decode from a file or a buffer, resize to a concrete size,
//! and encode to disk. Dimension math and naming never live here.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` defined below.

use super::params::{ResizeParams, SaveParams};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

impl BackendError {
    /// True when the failure is a missing file or directory.
    ///
    /// The persistence layer uses this to decide whether creating the
    /// destination directory is worth a second write attempt.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Implementations are expected to be blocking. `Sync` so a single backend
/// can serve several sources processed on a rayon pool.
pub trait ImageBackend: Sync {
    /// Open and decode an image file.
    fn decode_file(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Decode an in-memory encoded image.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Resample `image` to exactly the requested size.
    fn resize(
        &self,
        image: &DynamicImage,
        params: &ResizeParams,
    ) -> Result<DynamicImage, BackendError>;

    /// Encode `image` and write it to `params.output`.
    ///
    /// A missing parent directory must surface as `BackendError::Io` with
    /// kind `NotFound`.
    fn save(&self, image: &DynamicImage, params: &SaveParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{OutputFormat, Quality};
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Size of every image the mock "decodes".
    pub const MOCK_SIZE: (u32, u32) = (400, 300);

    /// Mock backend that records operations without touching the filesystem.
    /// Uses Mutex (not RefCell) so it is Sync.
    #[derive(Default)]
    pub struct MockBackend {
        /// Paths for which `decode_file` reports `NotFound`.
        pub missing_paths: Mutex<Vec<PathBuf>>,
        /// Errors returned by successive `save` calls before saves succeed.
        pub save_failures: Mutex<VecDeque<BackendError>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        DecodeFile(String),
        DecodeBytes(usize),
        Resize {
            from: (u32, u32),
            width: u32,
            height: u32,
        },
        Save {
            output: String,
            format: OutputFormat,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_missing(paths: &[&str]) -> Self {
            let backend = Self::default();
            *backend.missing_paths.lock().unwrap() = paths.iter().map(PathBuf::from).collect();
            backend
        }

        pub fn with_save_failures(failures: Vec<BackendError>) -> Self {
            let backend = Self::default();
            *backend.save_failures.lock().unwrap() = failures.into();
            backend
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn saves(&self) -> Vec<RecordedOp> {
            self.get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::Save { .. }))
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode_file(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::DecodeFile(path.to_string_lossy().to_string()));

            if self.missing_paths.lock().unwrap().iter().any(|p| p == path) {
                return Err(BackendError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )));
            }
            Ok(DynamicImage::new_rgb8(MOCK_SIZE.0, MOCK_SIZE.1))
        }

        fn decode_bytes(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::DecodeBytes(bytes.len()));

            if bytes.is_empty() {
                return Err(BackendError::Decode("empty buffer".to_string()));
            }
            Ok(DynamicImage::new_rgb8(MOCK_SIZE.0, MOCK_SIZE.1))
        }

        fn resize(
            &self,
            image: &DynamicImage,
            params: &ResizeParams,
        ) -> Result<DynamicImage, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                from: (image.width(), image.height()),
                width: params.width,
                height: params.height,
            });
            Ok(DynamicImage::new_rgb8(params.width, params.height))
        }

        fn save(&self, _image: &DynamicImage, params: &SaveParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Save {
                output: params.output.to_string_lossy().to_string(),
                format: params.format,
                quality: params.quality.value(),
            });

            match self.save_failures.lock().unwrap().pop_front() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();
        let img = DynamicImage::new_rgb8(800, 600);

        let out = backend
            .resize(
                &img,
                &ResizeParams {
                    width: 200,
                    height: 150,
                },
            )
            .unwrap();
        assert_eq!(Dimensions::of(&out), Dimensions { width: 200, height: 150 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                from: (800, 600),
                width: 200,
                height: 150
            }
        ));
    }

    #[test]
    fn mock_returns_queued_save_failures_in_order() {
        let backend = MockBackend::with_save_failures(vec![BackendError::ProcessingFailed(
            "boom".to_string(),
        )]);
        let img = DynamicImage::new_rgb8(1, 1);
        let params = SaveParams {
            output: "/out/a.jpg".into(),
            format: OutputFormat::Jpeg,
            quality: Quality::default(),
        };

        assert!(backend.save(&img, &params).is_err());
        assert!(backend.save(&img, &params).is_ok());
        assert_eq!(backend.saves().len(), 2);
    }

    #[test]
    fn mock_missing_path_is_not_found() {
        let backend = MockBackend::with_missing(&["/missing.jpg"]);
        let err = backend.decode_file(Path::new("/missing.jpg")).unwrap_err();
        assert!(err.is_not_found());
        assert!(backend.decode_file(Path::new("/present.jpg")).is_ok());
    }

    #[test]
    fn is_not_found_only_matches_io_not_found() {
        let denied = BackendError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(!denied.is_not_found());
        assert!(!BackendError::Decode("bad".into()).is_not_found());
    }

    #[test]
    fn dimensions_display() {
        let dims = Dimensions {
            width: 640,
            height: 480,
        };
        assert_eq!(dims.to_string(), "640x480");
    }
}
