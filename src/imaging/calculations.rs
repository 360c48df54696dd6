//! Pure calculation functions for output dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Sizes are computed in `f64` and only narrowed once they are known to fit
//! within [`MAX_EDGE`] and [`MAX_PIXELS`].

use super::params::ResizeDirective;

/// Largest output edge accepted, in pixels.
pub const MAX_EDGE: u32 = 65_535;

/// Largest output area accepted, in pixels (16384 x 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Scale a single edge by `factor`, rounding and never dropping below 1px.
fn scale_edge(edge: u32, factor: f64) -> f64 {
    (edge as f64 * factor).round().max(1.0)
}

/// Narrow a computed edge to `u32`, or `None` past [`MAX_EDGE`].
fn checked_edge(edge: f64) -> Option<u32> {
    (edge.is_finite() && edge <= MAX_EDGE as f64).then_some(edge as u32)
}

/// Calculate the output size for a resize directive.
///
/// # Arguments
/// * `source` - Current image dimensions (width, height)
/// * `directive` - Resolved resize mode
///
/// # Returns
/// * `Some((width, height))` - Output dimensions, each at least 1px
/// * `None` - An edge exceeds [`MAX_EDGE`] or the area exceeds [`MAX_PIXELS`]
///
/// # Examples
/// ```
/// # use thumbnailer::imaging::{ResizeDirective, calculate_target_dimensions};
/// // Width-driven resize keeps the 4:3 aspect
/// assert_eq!(calculate_target_dimensions((800, 600), ResizeDirective::FitWidth(400)), Some((400, 300)));
///
/// // Percentage scales both axes
/// assert_eq!(calculate_target_dimensions((800, 600), ResizeDirective::Scale(0.25)), Some((200, 150)));
///
/// // Too large to allocate
/// assert_eq!(calculate_target_dimensions((800, 600), ResizeDirective::Scale(1000.0)), None);
/// ```
pub fn calculate_target_dimensions(
    source: (u32, u32),
    directive: ResizeDirective,
) -> Option<(u32, u32)> {
    let (src_w, src_h) = (source.0.max(1), source.1.max(1));

    let (width, height) = match directive {
        ResizeDirective::Scale(factor) => (scale_edge(src_w, factor), scale_edge(src_h, factor)),
        ResizeDirective::Exact { width, height } => (width.max(1) as f64, height.max(1) as f64),
        ResizeDirective::FitWidth(width) => {
            let ratio = width as f64 / src_w as f64;
            (width.max(1) as f64, scale_edge(src_h, ratio))
        }
        ResizeDirective::FitHeight(height) => {
            let ratio = height as f64 / src_h as f64;
            (scale_edge(src_w, ratio), height.max(1) as f64)
        }
    };

    let (width, height) = (checked_edge(width)?, checked_edge(height)?);
    let pixels = (width as u64).checked_mul(height as u64)?;
    (pixels <= MAX_PIXELS).then_some((width, height))
}
