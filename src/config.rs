//! Generator configuration.
//!
//! Handles loading, validating, and merging `thumbnailer.toml`. User files are
//! sparse: they are merged key-by-key on top of the stock defaults, so only
//! the values that differ need to be written.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! destination = "thumbnails"  # Output directory
//! prefix = ""                 # Prepended to every output filename
//! # name = "cover.jpg"        # Output filename instead of the source's
//! resize_from = "previous"    # "previous" chains resizes, "original" fans out
//!
//! [target]
//! width = 220                 # Size used when no dimensions are given
//! height = 220
//! percentage = 0.4            # Scale used by a bare `--percentage`
//!
//! [encoding]
//! format = "jpeg"             # jpeg | png | tiff | bmp | webp
//! quality = 75                # JPEG quality (1-100)
//!
//! [processing]
//! max_processes = 4           # Max parallel sources (omit for auto = CPU cores)
//!
//! [[dimensions]]              # One table per output variant, in order
//! width = 640
//! prefix = "md-"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Dimension entries are not
//! validated here: an entry that sets no size produces a failed result at
//! generation time, and `thumbnailer check` lists them.

use crate::dimension::DimensionSpec;
use crate::imaging::{OutputFormat, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "thumbnailer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Which pixels each output variant is resized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFrom {
    /// Each variant resizes the previous variant's pixels, and the source
    /// image ends up holding the last variant.
    #[default]
    Previous,
    /// Each variant resizes a copy of the original pixels; the source image
    /// is left untouched.
    Original,
}

/// Configuration of a [`Generator`](crate::generate::Generator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory outputs are written to.
    pub destination: PathBuf,
    /// Prefix glued onto every output filename.
    pub prefix: String,
    /// Default output filename, replacing the source's base name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub resize_from: ResizeFrom,
    /// Fallback sizing for one-off resizes.
    pub target: TargetConfig,
    pub encoding: EncodingConfig,
    pub processing: ProcessingConfig,
    /// Output variants produced per source, in order.
    pub dimensions: Vec<DimensionSpec>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("thumbnails"),
            prefix: String::new(),
            name: None,
            resize_from: ResizeFrom::default(),
            target: TargetConfig::default(),
            encoding: EncodingConfig::default(),
            processing: ProcessingConfig::default(),
            dimensions: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.encoding.quality.value()) {
            return Err(ConfigError::Validation(
                "encoding.quality must be 1-100".into(),
            ));
        }
        if self.target.width == 0 || self.target.height == 0 {
            return Err(ConfigError::Validation(
                "target.width and target.height must be non-zero".into(),
            ));
        }
        if !(self.target.percentage > 0.0 && self.target.percentage.is_finite()) {
            return Err(ConfigError::Validation(
                "target.percentage must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Indices (0-based) of dimension entries that set no usable size.
    pub fn unresolvable_dimensions(&self) -> Vec<usize> {
        self.dimensions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.directive().is_err())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Sizing used when a caller asks for "the default" size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub width: u32,
    pub height: u32,
    /// Scale factor, `0.4` = 40%.
    pub percentage: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            width: 220,
            height: 220,
            percentage: 0.4,
        }
    }
}

/// Output encoding settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    pub format: OutputFormat,
    pub quality: Quality,
}

/// Parallel processing settings for batches of sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of sources processed at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GeneratorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<GeneratorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GeneratorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a specific config file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Load `thumbnailer.toml` from a directory, falling back to stock defaults
/// when there is none.
pub fn load_config(dir: &Path) -> Result<GeneratorConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return resolve_config(stock_defaults_value(), None);
    }
    load_config_file(&config_path)
}

/// Returns a fully-commented stock `thumbnailer.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Thumbnailer Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Directory thumbnails are written to.
destination = "thumbnails"

# Prepended to every output filename, with no separator: "sm-" + "cat.jpg".
prefix = ""

# Output filename used instead of the source's own name.
# name = "cover.jpg"

# Which pixels each variant is resized from:
#   "previous" - each variant resizes the one before it (cheap, compounding)
#   "original" - each variant resizes the untouched source
resize_from = "previous"

# ---------------------------------------------------------------------------
# Default sizing for one-off resizes (`thumbnailer resize`)
# ---------------------------------------------------------------------------
[target]
width = 220
height = 220
# Scale factor used by a bare `--percentage` flag (0.4 = 40%).
percentage = 0.4

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# jpeg | png | tiff | bmp | webp
format = "jpeg"
# JPEG quality (1 = worst, 100 = best). Ignored by lossless formats.
quality = 75

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of source images processed in parallel.
# Omit to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Output variants, produced in the order listed.
# ---------------------------------------------------------------------------
# Each entry sets a size (percentage wins, then width+height, then width or
# height alone with the aspect ratio kept) and may override naming:
#
# [[dimensions]]
# width = 640
# prefix = "md-"
#
# [[dimensions]]
# percentage = 0.25
# name = "small.jpg"
#
# [[dimensions]]
# width = 64
# height = 64
# destination = "public/favicon.png"   # full path, used verbatim
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = GeneratorConfig::default();
        assert_eq!(config.destination, PathBuf::from("thumbnails"));
        assert_eq!(config.prefix, "");
        assert_eq!(config.name, None);
        assert_eq!(config.resize_from, ResizeFrom::Previous);
        assert_eq!((config.target.width, config.target.height), (220, 220));
        assert_eq!(config.target.percentage, 0.4);
        assert_eq!(config.encoding.format, OutputFormat::Jpeg);
        assert_eq!(config.encoding.quality.value(), 75);
        assert!(config.dimensions.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let config: GeneratorConfig = toml::from_str(
            r#"
prefix = "t-"

[encoding]
format = "png"
"#,
        )
        .unwrap();
        assert_eq!(config.prefix, "t-");
        assert_eq!(config.encoding.format, OutputFormat::Png);
        // Defaults preserved
        assert_eq!(config.encoding.quality.value(), 75);
        assert_eq!(config.destination, PathBuf::from("thumbnails"));
    }

    #[test]
    fn parse_dimensions_in_order() {
        let config: GeneratorConfig = toml::from_str(
            r#"
[[dimensions]]
width = 640

[[dimensions]]
percentage = 0.25
name = "small.jpg"
"#,
        )
        .unwrap();
        assert_eq!(config.dimensions.len(), 2);
        assert_eq!(config.dimensions[0].width, Some(640));
        assert_eq!(config.dimensions[1].percentage, Some(0.25));
        assert_eq!(config.dimensions[1].name.as_deref(), Some("small.jpg"));
    }

    #[test]
    fn parse_resize_from_original() {
        let config: GeneratorConfig = toml::from_str(r#"resize_from = "original""#).unwrap();
        assert_eq!(config.resize_from, ResizeFrom::Original);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<GeneratorConfig, _> = toml::from_str("destnation = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn merge_overlay_keeps_base_keys() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[encoding]\nquality = 90").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.encoding.quality.value(), 90);
        assert_eq!(config.encoding.format, OutputFormat::Jpeg);
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let base: toml::Value = toml::from_str("[[dimensions]]\nwidth = 1").unwrap();
        let overlay: toml::Value =
            toml::from_str("[[dimensions]]\nheight = 2\n[[dimensions]]\nheight = 3").unwrap();
        let merged = merge_toml(base, overlay);
        let dims = merged["dimensions"].as_array().unwrap();
        assert_eq!(dims.len(), 2);
        assert!(dims[0].get("width").is_none());
    }

    #[test]
    fn validate_rejects_bad_quality() {
        let mut config = GeneratorConfig::default();
        config.encoding.quality = Quality(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.encoding.quality = Quality(101);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_target() {
        let mut config = GeneratorConfig::default();
        config.target.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_percentage() {
        let mut config = GeneratorConfig::default();
        config.target.percentage = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_allows_unresolvable_dimensions() {
        let config = GeneratorConfig {
            dimensions: vec![DimensionSpec::width(10), DimensionSpec::default()],
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.unresolvable_dimensions(), vec![1]);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.destination, PathBuf::from("thumbnails"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
destination = "out"

[[dimensions]]
width = 100
prefix = "sm-"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.destination, PathBuf::from("out"));
        assert_eq!(config.dimensions, vec![DimensionSpec::width(100).with_prefix("sm-")]);
        assert_eq!((config.target.width, config.target.height), (220, 220));
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not toml = = =").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_validates_after_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[encoding]\nquality = 0").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_matches_defaults() {
        let config: GeneratorConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = GeneratorConfig::default();
        assert_eq!(config.destination, defaults.destination);
        assert_eq!(config.prefix, defaults.prefix);
        assert_eq!(config.resize_from, defaults.resize_from);
        assert_eq!(config.target.width, defaults.target.width);
        assert_eq!(config.target.percentage, defaults.target.percentage);
        assert_eq!(config.encoding.format, defaults.encoding.format);
        assert_eq!(config.encoding.quality, defaults.encoding.quality);
        assert!(config.dimensions.is_empty());
    }

    #[test]
    fn effective_threads_clamps() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_processes: Some(10_000)
            }),
            cores
        );
        assert_eq!(
            effective_threads(&ProcessingConfig {
                max_processes: Some(0)
            }),
            1
        );
    }
}
