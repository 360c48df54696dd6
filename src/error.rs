//! Error type shared by the loading, resizing, naming and saving stages.

use crate::imaging::BackendError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// The image has no decoded pixels to work with.
    #[error("invalid image data")]
    InvalidImageData,
    /// No resize mode could be resolved, or no output dimensions are configured.
    #[error("no transform data was provided")]
    NoTransformSpecified,
    /// Reserved for content-type validation of sources.
    #[error("invalid mimetype")]
    InvalidMimeType,
    /// Reserved for a configurable resampling filter.
    #[error("invalid scaler")]
    InvalidScaler,
    /// The resolved output size is too large to allocate safely.
    #[error("output size for {0} exceeds the pixel limit")]
    OutputTooLarge(String),
    #[error("no output filename could be resolved")]
    MissingFilename,
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    /// A panic inside the resize engine or encoder, caught at the call boundary.
    #[error("internal fault: {0}")]
    Internal(String),
}

impl ThumbnailError {
    /// True when the error came from a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Imaging(e) => e.is_not_found(),
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
