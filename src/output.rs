//! CLI output formatting.
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability; `main` prints the lines. Format functions are pure — no I/O.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Normalizing 3 images from originals/
//! 001 cover.png → 1000x1384
//!     Sizes: original 2.4 MB, output 312.0 KB (13%)
//! 002 broken.jpg
//!     Skipped: Failed to decode originals/broken.jpg: ...
//! 003 page-02.tif → 1000x1384
//!     Sizes: original 8.1 MB, reference 401.3 KB, output 298.7 KB (4%)
//!
//! Wrote 2 images, skipped 1 (10.5 MB → 610.7 KB)
//! ```
//!
//! ## Inspect
//!
//! ```text
//! out/cover.jpg
//!     Dimensions: 1000x1384
//!     JFIF: 1.02
//!     Density: 72x72 pixels/inch
//! ```

use crate::imaging::{Dimensions, JfifDensity};
use crate::process::{ProcessEvent, ProcessReport, SizeComparison};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Human-readable byte count (B, KB, MB, GB; base 1024).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn format_sizes(sizes: &SizeComparison) -> String {
    let mut parts = vec![format!("original {}", format_bytes(sizes.original))];
    if let Some(reference) = sizes.reference {
        parts.push(format!("reference {}", format_bytes(reference)));
    }
    parts.push(format!("output {}", format_bytes(sizes.output)));
    let mut line = format!("Sizes: {}", parts.join(", "));
    if let Some(ratio) = sizes.ratio() {
        line.push_str(&format!(" ({:.0}%)", ratio * 100.0));
    }
    line
}

fn format_dimensions(dims: &Dimensions) -> String {
    format!("{}x{}", dims.width, dims.height)
}

/// Lines for one batch progress event.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            input_dir,
            image_count,
        } => vec![format!(
            "Normalizing {} images from {}",
            image_count, input_dir
        )],
        ProcessEvent::ImageWritten { index, entry } => vec![
            format!(
                "{} {} → {}",
                format_index(*index),
                file_name(&entry.source),
                format_dimensions(&entry.dimensions)
            ),
            format!("{}{}", indent(1), format_sizes(&entry.sizes)),
        ],
        ProcessEvent::ImageSkipped { index, entry } => vec![
            format!("{} {}", format_index(*index), file_name(&entry.source)),
            format!("{}Skipped: {}", indent(1), entry.reason),
        ],
    }
}

/// Closing summary line for a batch.
pub fn format_summary(report: &ProcessReport) -> Vec<String> {
    let mut line = format!("Wrote {} images", report.written.len());
    if !report.skipped.is_empty() {
        line.push_str(&format!(", skipped {}", report.skipped.len()));
    }
    if !report.written.is_empty() {
        line.push_str(&format!(
            " ({} → {})",
            format_bytes(report.total_original_bytes()),
            format_bytes(report.total_output_bytes())
        ));
    }
    vec![String::new(), line]
}

/// Lines for `pagefit inspect`.
pub fn format_inspect(
    path: &Path,
    dims: Option<Dimensions>,
    density: Option<JfifDensity>,
) -> Vec<String> {
    let mut lines = vec![path.display().to_string()];
    if let Some(dims) = dims {
        lines.push(format!("{}Dimensions: {}", indent(1), format_dimensions(&dims)));
    }
    match density {
        Some(d) => {
            lines.push(format!(
                "{}JFIF: {}.{:02}",
                indent(1),
                d.major_version,
                d.minor_version
            ));
            lines.push(format!(
                "{}Density: {}x{} {}",
                indent(1),
                d.x,
                d.y,
                d.unit.label()
            ));
        }
        None => lines.push(format!("{}Density: no JFIF header", indent(1))),
    }
    lines
}

/// Print lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
