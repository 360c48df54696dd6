//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Generate
//!
//! Sources are listed by position. Each configured dimension gets one line,
//! labelled by its sizing, showing where the file went or why it failed:
//!
//! ```text
//! 001 photos/cat.jpg
//!     640x?: thumbnails/md-cat.jpg
//!     40%: thumbnails/sm-cat.jpg
//! 002 photos/broken.jpg
//!     error: Image processing failed: Failed to decode image: ...
//!
//! Generated 2 of 2 outputs from 2 sources, 1 source failed
//! ```
//!
//! ## Check
//!
//! ```text
//! Destination: thumbnails
//! Encoding: jpeg (quality 75)
//! Dimensions
//! 001 640x? prefix md-
//! 002 invalid
//!
//! 1 of 2 dimensions cannot be resolved
//! ```

use crate::config::GeneratorConfig;
use crate::dimension::DimensionSpec;
use crate::generate::GenerationResult;
use serde::Serialize;
use std::path::PathBuf;

/// Everything that happened to one source: either a load/setup error or a
/// result per configured dimension.
#[derive(Debug, Serialize)]
pub struct SourceReport {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<GenerationResult>,
}

impl SourceReport {
    pub fn completed(source: PathBuf, results: Vec<GenerationResult>) -> Self {
        Self {
            source,
            error: None,
            results,
        }
    }

    pub fn aborted(source: PathBuf, error: impl ToString) -> Self {
        Self {
            source,
            error: Some(error.to_string()),
            results: Vec::new(),
        }
    }

    /// True when the source or any of its outputs failed.
    pub fn has_failures(&self) -> bool {
        self.error.is_some() || self.results.iter().any(|r| !r.is_ok())
    }
}

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Format one dimension's outcome.
///
/// ```text
/// 640x?: thumbnails/md-cat.jpg
/// invalid: failed: no transform data was provided
/// ```
fn result_line(label: &str, result: &GenerationResult) -> String {
    match &result.error {
        None => format!("{}{}: {}", indent(1), label, result.path.display()),
        Some(e) => format!("{}{}: failed: {}", indent(1), label, e),
    }
}

// ============================================================================
// generate
// ============================================================================

/// Format the reports of a `generate` run.
///
/// `dimensions` labels the results positionally; results beyond the list are
/// labelled `#n`.
pub fn format_generate_output(reports: &[SourceReport], dimensions: &[DimensionSpec]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut written = 0;
    let mut total = 0;
    let mut failed_sources = 0;

    for (i, report) in reports.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), report.source.display()));
        if let Some(error) = &report.error {
            lines.push(format!("{}error: {}", indent(1), error));
        }
        for (j, result) in report.results.iter().enumerate() {
            let label = dimensions
                .get(j)
                .map(DimensionSpec::label)
                .unwrap_or_else(|| format!("#{}", j + 1));
            lines.push(result_line(&label, result));
        }

        total += report.results.len();
        written += report.results.iter().filter(|r| r.is_ok()).count();
        if report.has_failures() {
            failed_sources += 1;
        }
    }

    lines.push(String::new());
    let mut summary = format!(
        "Generated {} of {} from {}",
        written,
        plural(total, "output"),
        plural(reports.len(), "source")
    );
    if failed_sources > 0 {
        summary.push_str(&format!(", {} failed", plural(failed_sources, "source")));
    }
    lines.push(summary);
    lines
}

pub fn print_generate_output(reports: &[SourceReport], dimensions: &[DimensionSpec]) {
    for line in format_generate_output(reports, dimensions) {
        println!("{}", line);
    }
}

// ============================================================================
// resize
// ============================================================================

/// Format the outcome of a one-off resize.
pub fn format_resize_output(label: &str, result: &GenerationResult) -> String {
    format!("{} → {}", label, result.path.display())
}

pub fn print_resize_output(label: &str, result: &GenerationResult) {
    println!("{}", format_resize_output(label, result));
}

// ============================================================================
// check
// ============================================================================

fn dimension_details(spec: &DimensionSpec) -> String {
    let mut details = vec![spec.label()];
    if let Some(prefix) = spec.prefix.as_deref().filter(|p| !p.is_empty()) {
        details.push(format!("prefix {prefix}"));
    }
    if let Some(name) = spec.name.as_deref().filter(|n| !n.is_empty()) {
        details.push(format!("name {name}"));
    }
    if let Some(dest) = &spec.destination {
        details.push(format!("→ {}", dest.display()));
    }
    details.join(" ")
}

/// Format the effective configuration and flag unresolvable dimensions.
pub fn format_check_output(config: &GeneratorConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Destination: {}", config.destination.display()),
        format!(
            "Encoding: {} (quality {})",
            config.encoding.format,
            config.encoding.quality.value()
        ),
    ];
    if !config.prefix.is_empty() {
        lines.push(format!("Prefix: {}", config.prefix));
    }

    if config.dimensions.is_empty() {
        lines.push("No dimensions configured".to_string());
        return lines;
    }

    lines.push("Dimensions".to_string());
    for (i, spec) in config.dimensions.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), dimension_details(spec)));
    }

    let invalid = config.unresolvable_dimensions();
    lines.push(String::new());
    if invalid.is_empty() {
        lines.push("Config OK".to_string());
    } else {
        lines.push(format!(
            "{} of {} cannot be resolved",
            invalid.len(),
            plural(config.dimensions.len(), "dimension")
        ));
    }
    lines
}

pub fn print_check_output(config: &GeneratorConfig) {
    for line in format_check_output(config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ThumbnailError;
    use std::path::Path;

    fn ok(path: &str) -> GenerationResult {
        GenerationResult::saved(
            Path::new(path).file_name().unwrap().to_string_lossy(),
            path,
        )
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn generate_output_lists_results_with_labels() {
        let reports = vec![SourceReport::completed(
            PathBuf::from("photos/cat.jpg"),
            vec![
                ok("thumbnails/md-cat.jpg"),
                GenerationResult::failed(
                    Path::new("photos/cat.jpg"),
                    ThumbnailError::NoTransformSpecified,
                ),
            ],
        )];
        let dims = vec![DimensionSpec::width(640), DimensionSpec::default()];

        assert_eq!(
            format_generate_output(&reports, &dims),
            vec![
                "001 photos/cat.jpg",
                "    640x?: thumbnails/md-cat.jpg",
                "    invalid: failed: no transform data was provided",
                "",
                "Generated 1 of 2 outputs from 1 source, 1 source failed",
            ]
        );
    }

    #[test]
    fn generate_output_shows_source_errors() {
        let reports = vec![
            SourceReport::completed(PathBuf::from("a.jpg"), vec![ok("t/a.jpg")]),
            SourceReport::aborted(PathBuf::from("b.jpg"), "cannot open"),
        ];
        let lines = format_generate_output(&reports, &[DimensionSpec::percentage(0.4)]);

        assert_eq!(lines[1], "    40%: t/a.jpg");
        assert_eq!(lines[2], "002 b.jpg");
        assert_eq!(lines[3], "    error: cannot open");
        assert_eq!(
            lines.last().unwrap(),
            "Generated 1 of 1 output from 2 sources, 1 source failed"
        );
    }

    #[test]
    fn generate_output_labels_extra_results_by_position() {
        let reports = vec![SourceReport::completed(
            PathBuf::from("a.jpg"),
            vec![ok("t/a.jpg")],
        )];
        assert_eq!(format_generate_output(&reports, &[])[1], "    #1: t/a.jpg");
    }

    #[test]
    fn report_failure_detection() {
        assert!(!SourceReport::completed(PathBuf::from("a"), vec![ok("t/a")]).has_failures());
        assert!(SourceReport::aborted(PathBuf::from("a"), "x").has_failures());
    }

    #[test]
    fn report_serializes_without_empty_error() {
        let json = serde_json::to_value(SourceReport::completed(
            PathBuf::from("a.jpg"),
            vec![ok("t/a.jpg")],
        ))
        .unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["results"][0]["filename"], "a.jpg");
    }

    #[test]
    fn check_output_flags_invalid_dimensions() {
        let config = GeneratorConfig {
            dimensions: vec![
                DimensionSpec::width(640).with_prefix("md-"),
                DimensionSpec::default(),
            ],
            ..GeneratorConfig::default()
        };
        let lines = format_check_output(&config);

        assert_eq!(lines[0], "Destination: thumbnails");
        assert_eq!(lines[1], "Encoding: jpeg (quality 75)");
        assert!(lines.contains(&"001 640x? prefix md-".to_string()));
        assert!(lines.contains(&"002 invalid".to_string()));
        assert_eq!(lines.last().unwrap(), "1 of 2 dimensions cannot be resolved");
    }

    #[test]
    fn check_output_without_dimensions() {
        let lines = format_check_output(&GeneratorConfig::default());
        assert_eq!(lines.last().unwrap(), "No dimensions configured");
    }

    #[test]
    fn resize_output_line() {
        assert_eq!(
            format_resize_output("220x220", &ok("out/a.jpg")),
            "220x220 → out/a.jpg"
        );
    }
}
