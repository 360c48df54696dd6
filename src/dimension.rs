//! Dimension specifications: how one output variant is sized and named.
//!
//! A spec may set any combination of `width`, `height` and `percentage`;
//! [`DimensionSpec::directive`] picks the single resize mode that applies,
//! first match wins:
//!
//! 1. `percentage > 0` → proportional scale of both axes
//! 2. `width > 0` and `height > 0` → exact size
//! 3. `width > 0` → width-driven, aspect preserved
//! 4. `height > 0` → height-driven, aspect preserved
//!
//! Anything else is [`ThumbnailError::NoTransformSpecified`].

use crate::error::ThumbnailError;
use crate::imaging::ResizeDirective;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One requested output variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DimensionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Scale factor, `0.4` = 40% of the source on both axes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Replaces the generator's filename prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Replaces the output filename. Only the base name is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full output path, bypassing the generator's destination directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl DimensionSpec {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn exact(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn percentage(percentage: f64) -> Self {
        Self {
            percentage: Some(percentage),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Resolve the resize mode for this spec.
    pub fn directive(&self) -> Result<ResizeDirective, ThumbnailError> {
        if let Some(p) = self.percentage.filter(|p| *p > 0.0 && p.is_finite()) {
            return Ok(ResizeDirective::Scale(p));
        }

        let width = self.width.filter(|w| *w > 0);
        let height = self.height.filter(|h| *h > 0);
        match (width, height) {
            (Some(width), Some(height)) => Ok(ResizeDirective::Exact { width, height }),
            (Some(width), None) => Ok(ResizeDirective::FitWidth(width)),
            (None, Some(height)) => Ok(ResizeDirective::FitHeight(height)),
            (None, None) => Err(ThumbnailError::NoTransformSpecified),
        }
    }

    /// Short human-readable description of the sizing, e.g. `640x?` or `40%`.
    pub fn label(&self) -> String {
        match self.directive() {
            Ok(ResizeDirective::Scale(p)) => format!("{}%", (p * 100.0).round()),
            Ok(ResizeDirective::Exact { width, height }) => format!("{width}x{height}"),
            Ok(ResizeDirective::FitWidth(width)) => format!("{width}x?"),
            Ok(ResizeDirective::FitHeight(height)) => format!("?x{height}"),
            Err(_) => "invalid".to_string(),
        }
    }
}
