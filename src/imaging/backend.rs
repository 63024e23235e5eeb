//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two collaborators the pipeline talks
//! to outside of pure pixel work: the decoder that turns a file into a raster,
//! and the sink that writes the finished JPEG. Resizing and canvas
//! normalization are plain functions in [`operations`](super::operations) and
//! never go through the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock.

use super::params::EncodeParams;
use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidImage { width: u32, height: u32 },
    #[error("No JPEG encoder is available in this build")]
    MissingEncoder,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

impl ImagingError {
    /// Whether this error makes every remaining file in a batch fail the same way.
    ///
    /// Only a missing encoder qualifies; everything else is scoped to one file.
    pub fn aborts_run(&self) -> bool {
        matches!(self, ImagingError::MissingEncoder)
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
        }
    }
}

/// Decoder and JPEG sink used by the per-file pipeline.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, ImagingError>;

    /// Decode a file into an opaque 8-bit RGB raster.
    fn decode(&self, path: &Path) -> Result<RgbImage, ImagingError>;

    /// Encode `img` as JPEG and write it to `path`, replacing any stale file.
    fn write_jpeg(
        &self,
        path: &Path,
        img: &RgbImage,
        params: &EncodeParams,
    ) -> Result<(), ImagingError>;
}
