//! Writing pixels to disk.
//!
//! A write into a directory that does not exist yet creates the whole tree
//! (mode `0755` on Unix) and retries exactly once. Any other failure, or a
//! second failure after the directory was created, is returned as-is.

use crate::error::ThumbnailError;
use crate::imaging::operations::guarded;
use crate::imaging::{ImageBackend, OutputFormat, Quality, SaveParams};
use crate::naming::base_name;
use image::DynamicImage;
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of producing one output variant.
///
/// The generator records one of these for every requested dimension, failed
/// or not, so callers must check `error`.
#[derive(Debug, Serialize)]
pub struct GenerationResult {
    pub filename: String,
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ThumbnailError>,
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<ThumbnailError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl GenerationResult {
    pub fn saved(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            error: None,
        }
    }

    /// A failed output, reported under the source image's path.
    pub fn failed(source: &Path, error: ThumbnailError) -> Self {
        Self {
            filename: source.to_string_lossy().to_string(),
            path: source.to_path_buf(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Create `dir` and any missing parents.
pub fn create_output_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

/// Encode and write `pixels`, creating the parent directory on a not-found
/// failure and retrying once.
pub fn save_with_retry(
    backend: &impl ImageBackend,
    pixels: &DynamicImage,
    params: &SaveParams,
) -> Result<(), ThumbnailError> {
    let err = match guarded("save", || backend.save(pixels, params)) {
        Ok(()) => return Ok(()),
        Err(e) if e.is_not_found() => e,
        Err(e) => {
            warn!("failed to write {}: {}", params.output.display(), e);
            return Err(e);
        }
    };

    let Some(dir) = params.output.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Err(err);
    };
    debug!("creating output directory {}", dir.display());
    create_output_dir(dir).map_err(|source| {
        warn!("failed to create {}: {}", dir.display(), source);
        ThumbnailError::Io {
            path: dir.to_path_buf(),
            source,
        }
    })?;

    guarded("save", || backend.save(pixels, params)).inspect_err(|e| {
        warn!("failed to write {}: {}", params.output.display(), e);
    })
}

/// Write pixels to an explicit path without a generator.
///
/// `pixels` of `None` or an empty `path` fail with
/// [`ThumbnailError::InvalidImageData`] before anything touches the disk.
pub fn save_raw(
    backend: &impl ImageBackend,
    pixels: Option<&DynamicImage>,
    path: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<GenerationResult, ThumbnailError> {
    let pixels = pixels.ok_or(ThumbnailError::InvalidImageData)?;
    if path.as_os_str().is_empty() {
        return Err(ThumbnailError::InvalidImageData);
    }

    save_with_retry(
        backend,
        pixels,
        &SaveParams {
            output: path.to_path_buf(),
            format,
            quality,
        },
    )?;
    Ok(GenerationResult::saved(base_name(path), path))
}
