//! Output filename and path resolution.
//!
//! Each value is taken from the first source that sets it (empty strings
//! count as unset):
//!
//! | Value | 1st | 2nd | 3rd |
//! |---|---|---|---|
//! | filename | `spec.name` (base name only) | `config.name` | base name of the source path |
//! | prefix | `spec.prefix` | `config.prefix` | |
//! | path | `spec.destination`, verbatim | `config.destination` / `prefix + filename` | |
//!
//! The prefix is glued straight onto the filename: `sm-` + `cat.jpg` →
//! `sm-cat.jpg`. The output extension is never rewritten to match the
//! encoding format.
//!
//! When a destination override is set, the file is written to exactly that
//! path and the reported `filename` is the override's own base name, so the
//! reported name and the file on disk always agree.

use crate::config::GeneratorConfig;
use crate::dimension::DimensionSpec;
use crate::source::Image;
use std::path::{Path, PathBuf};

/// Where one output variant is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Directory containing the output file.
    pub directory: PathBuf,
    /// File name as reported to callers.
    pub filename: String,
    /// Full output path.
    pub path: PathBuf,
}

/// Final path component of `path` as a string; empty if there is none.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the filename (without prefix) for an output.
///
/// A spec name with no file name component (`..`, `/`) counts as unset.
pub fn resolve_filename(config: &GeneratorConfig, image: &Image, spec: &DimensionSpec) -> String {
    let spec_name = non_empty(spec.name.as_deref()).map(|n| base_name(Path::new(n)));
    if let Some(name) = spec_name.filter(|n| !n.is_empty()) {
        return name;
    }
    if let Some(name) = non_empty(config.name.as_deref()) {
        return name.to_string();
    }
    base_name(&image.path)
}

/// Resolve the filename prefix for an output.
pub fn resolve_prefix<'a>(config: &'a GeneratorConfig, spec: &'a DimensionSpec) -> &'a str {
    non_empty(spec.prefix.as_deref()).unwrap_or(&config.prefix)
}

/// Compute the directory, filename and full path for one output variant.
///
/// Returns `None` for the filename when nothing resolves (in-memory image,
/// no name configured, no destination override).
pub fn resolve_output_path(
    config: &GeneratorConfig,
    image: &Image,
    spec: &DimensionSpec,
) -> Option<OutputLocation> {
    if let Some(destination) = spec
        .destination
        .as_deref()
        .filter(|d| !d.as_os_str().is_empty())
    {
        return Some(OutputLocation {
            directory: destination
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            filename: base_name(destination),
            path: destination.to_path_buf(),
        });
    }

    let filename = resolve_filename(config, image, spec);
    if filename.is_empty() {
        return None;
    }

    let filename = format!("{}{}", resolve_prefix(config, spec), filename);
    Some(OutputLocation {
        directory: config.destination.clone(),
        path: config.destination.join(&filename),
        filename,
    })
}
