//! Batch normalization of a directory of images.
//!
//! Walks the input directory (one level, sorted by file name), runs every
//! supported image through the per-file pipeline and writes
//! `<stem>.jpg` into the output directory. When two inputs share a stem
//! (`page.png` and `page.tif`), the first in name order wins and the later
//! one is skipped rather than overwriting it.
//!
//! ## Error policy
//!
//! A file that fails to decode, has degenerate dimensions, or cannot be
//! written is skipped and recorded in the report; the run continues. A
//! missing JPEG encoder aborts the run at the first file, since every
//! remaining file would fail the same way.
//!
//! ## Size comparison
//!
//! Each written file records the byte size of its source and its output. When
//! a reference directory is given (e.g. the same pages exported by hand from a
//! desktop editor), the reference file with the same name is sized too, so the
//! report shows how the automated output compares.

use crate::imaging::{
    Dimensions, ImageBackend, ImagingError, NormalizeConfig, RustBackend, is_supported_input,
    normalize_file,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] ImagingError),
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Output directory must differ from input directory: {0}")]
    SameDirectory(PathBuf),
}

/// Directories for a batch run.
#[derive(Debug, Clone)]
pub struct BatchPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Optional directory of hand-made exports to compare sizes against.
    pub reference_dir: Option<PathBuf>,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    BatchStarted {
        input_dir: String,
        image_count: usize,
    },
    ImageWritten {
        index: usize,
        entry: WrittenImage,
    },
    ImageSkipped {
        index: usize,
        entry: SkippedImage,
    },
}

/// A successfully normalized file.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenImage {
    pub source: String,
    pub output: String,
    pub dimensions: Dimensions,
    pub sizes: SizeComparison,
}

/// Byte sizes of the source, the output, and an optional reference export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeComparison {
    pub original: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<u64>,
    pub output: u64,
}

impl SizeComparison {
    /// Output size as a fraction of the original.
    pub fn ratio(&self) -> Option<f64> {
        (self.original > 0).then(|| self.output as f64 / self.original as f64)
    }
}

/// A file that could not be normalized.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub source: String,
    pub reason: String,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessReport {
    pub written: Vec<WrittenImage>,
    pub skipped: Vec<SkippedImage>,
}

impl ProcessReport {
    pub fn total_original_bytes(&self) -> u64 {
        self.written.iter().map(|w| w.sizes.original).sum()
    }

    pub fn total_output_bytes(&self) -> u64 {
        self.written.iter().map(|w| w.sizes.output).sum()
    }
}

/// Run a batch with the production backend.
pub fn process(
    paths: &BatchPaths,
    config: &NormalizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    process_with_backend(&RustBackend::new(), paths, config, events)
}

/// Run a batch using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    paths: &BatchPaths,
    config: &NormalizeConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    let sources = list_inputs(&paths.input_dir)?;
    if same_directory(&paths.input_dir, &paths.output_dir) {
        return Err(ProcessError::SameDirectory(paths.output_dir.clone()));
    }
    std::fs::create_dir_all(&paths.output_dir)?;

    let emit = |event: ProcessEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };
    emit(ProcessEvent::BatchStarted {
        input_dir: paths.input_dir.display().to_string(),
        image_count: sources.len(),
    });

    let mut report = ProcessReport::default();
    // Output path -> source that produced it in this run.
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

    for (i, source) in sources.iter().enumerate() {
        let index = i + 1;
        let output = output_path_for(source, &paths.output_dir);

        if let Some(earlier) = claimed.get(&output) {
            let reason = format!(
                "Output {} already written from {}",
                output.display(),
                earlier.display()
            );
            tracing::warn!(source = %source.display(), %reason, "Skipping image");
            let entry = SkippedImage {
                source: source.display().to_string(),
                reason,
            };
            emit(ProcessEvent::ImageSkipped {
                index,
                entry: entry.clone(),
            });
            report.skipped.push(entry);
            continue;
        }

        match normalize_file(backend, source, &output, config) {
            Ok(dimensions) => {
                let sizes = compare_sizes(source, &output, paths.reference_dir.as_deref());
                tracing::debug!(
                    source = %source.display(),
                    original = sizes.original,
                    output = sizes.output,
                    reference = ?sizes.reference,
                    "Wrote normalized image"
                );
                let entry = WrittenImage {
                    source: source.display().to_string(),
                    output: output.display().to_string(),
                    dimensions,
                    sizes,
                };
                emit(ProcessEvent::ImageWritten {
                    index,
                    entry: entry.clone(),
                });
                report.written.push(entry);
                claimed.insert(output, source.clone());
            }
            Err(e) if e.aborts_run() => {
                tracing::error!(source = %source.display(), error = %e, "Aborting batch");
                return Err(e.into());
            }
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "Skipping image");
                let entry = SkippedImage {
                    source: source.display().to_string(),
                    reason: e.to_string(),
                };
                emit(ProcessEvent::ImageSkipped {
                    index,
                    entry: entry.clone(),
                });
                report.skipped.push(entry);
            }
        }
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "Batch complete"
    );
    Ok(report)
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &ProcessReport, path: &Path) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Supported image files directly inside `dir`, sorted by file name.
pub fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !dir.is_dir() {
        return Err(ProcessError::InputNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if is_supported_input(path) {
            files.push(path.to_path_buf());
        } else {
            tracing::debug!(path = %path.display(), "Ignoring unsupported file");
        }
    }
    Ok(files)
}

/// `<output_dir>/<source stem>.jpg`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir.join(format!("{stem}.jpg"))
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

fn compare_sizes(source: &Path, output: &Path, reference_dir: Option<&Path>) -> SizeComparison {
    let reference = reference_dir
        .zip(source.file_name())
        .and_then(|(dir, name)| file_size(&dir.join(name)));
    SizeComparison {
        original: file_size(source).unwrap_or(0),
        reference,
        output: file_size(output).unwrap_or(0),
    }
}
