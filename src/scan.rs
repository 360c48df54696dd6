//! Source discovery.
//!
//! Expands the source arguments given on the command line into the list of
//! images to process. Arguments that are not directories are passed through
//! untouched, even when they do not exist, so that a missing primary can
//! still be replaced by a fallback image at load time. Directories are walked
//! recursively for files with a supported input extension:
//!
//! ```text
//! photos/                 ──▶  photos/a.jpg
//! ├── a.jpg                    photos/trip/b.PNG
//! ├── notes.txt
//! ├── .cache/c.jpg        (hidden, skipped)
//! ├── thumbnails/d.jpg    (output directory, skipped)
//! └── trip/
//!     └── b.PNG
//! ```
//!
//! Entries are visited in file-name order so repeated runs list sources in
//! the same order. Unreadable entries are logged and skipped.
//!
//! Each source remembers the directory it was found in relative to the
//! walked root (`trip` for `photos/trip/b.PNG`), so outputs can mirror the
//! source tree instead of landing in one flat directory. Sources that still
//! map to the same output name are separated by [`split_collisions`].

use crate::imaging::supported_input_extensions;
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A source image and where its outputs go relative to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory of the source relative to the walked root; empty for
    /// sources named directly and for files at the root.
    pub subdir: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, subdir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            subdir: subdir.into(),
        }
    }

    /// Output name relative to the destination, before any prefix.
    fn output_key(&self, name: Option<&str>) -> PathBuf {
        let file_name = match name.filter(|n| !n.is_empty()) {
            Some(name) => PathBuf::from(name),
            None => self.path.file_name().map(PathBuf::from).unwrap_or_default(),
        };
        self.subdir.join(file_name)
    }
}

/// Expand `paths` into source images, never descending into `skip_dir`.
pub fn collect_sources(paths: &[PathBuf], skip_dir: Option<&Path>) -> Vec<SourceFile> {
    let skip = skip_dir.and_then(|d| d.canonicalize().ok());
    let mut sources = Vec::new();

    for path in paths {
        if !path.is_dir() {
            sources.push(SourceFile::new(path.clone(), PathBuf::new()));
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || (!is_hidden(entry) && !is_skipped(entry, skip.as_deref()))
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_image(entry.path()) {
                let subdir = entry
                    .path()
                    .strip_prefix(path)
                    .ok()
                    .and_then(Path::parent)
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                sources.push(SourceFile::new(entry.into_path(), subdir));
            }
        }
    }

    sources
}

/// Separate sources whose outputs would overwrite an earlier source's.
///
/// Two sources collide when they share a subdirectory and a file name, or
/// when a fixed output `name` is configured and they share a subdirectory.
/// Returns the sources to process and, for each rejected one, the path of
/// the earlier source it collides with. Order is preserved.
pub fn split_collisions(
    sources: Vec<SourceFile>,
    name: Option<&str>,
) -> (Vec<SourceFile>, Vec<(SourceFile, PathBuf)>) {
    let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut unique = Vec::new();
    let mut collisions = Vec::new();

    for source in sources {
        let key = source.output_key(name);
        match seen.get(&key) {
            Some(first) => {
                warn!(
                    "{} would overwrite the output of {}; skipping",
                    source.path.display(),
                    first.display()
                );
                let first = first.clone();
                collisions.push((source, first));
            }
            None => {
                seen.insert(key, source.path.clone());
                unique.push(source);
            }
        }
    }

    (unique, collisions)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_skipped(entry: &DirEntry, skip: Option<&Path>) -> bool {
    let Some(skip) = skip else {
        return false;
    };
    entry.file_type().is_dir() && entry.path().canonicalize().is_ok_and(|p| p == skip)
}

fn is_image(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}
