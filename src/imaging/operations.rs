//! High-level image operations.
//!
//! The Resizer ([`resize_to_width`]) and the Canvas Normalizer
//! ([`fit_height`]) are pure functions from raster to raster. Each returns a
//! freshly allocated [`RgbImage`]; no stage hands back a view into its input.
//! [`normalize_file`] strings them together with the backend's decoder and
//! JPEG sink.

use super::backend::{Dimensions, ImageBackend, ImagingError};
use super::calculations::{HeightPlan, scaled_height};
use super::params::{EncodeParams, TargetSize};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Canvas fill colour for padded margins.
pub const PAD_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Everything the per-file pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    pub target: TargetSize,
    pub encode: EncodeParams,
}

/// Scale `img` to `width`, preserving aspect ratio, with Lanczos3 resampling.
pub fn resize_to_width(img: &RgbImage, width: u32) -> Result<RgbImage> {
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ImagingError::InvalidImage {
            width: src_w,
            height: src_h,
        });
    }
    if width == 0 {
        return Err(ImagingError::InvalidImage {
            width,
            height: src_h,
        });
    }

    let height = scaled_height(src_w, src_h, width);
    tracing::debug!(src_w, src_h, width, height, "Resizing");
    Ok(imageops::resize(img, width, height, FilterType::Lanczos3))
}

/// Crop or pad `img` vertically to exactly `height` rows, centred.
///
/// Taller rasters lose `(h - height) / 2` rows from the top and the rest from
/// the bottom. Shorter (or equal) rasters are drawn onto a white canvas at row
/// `(height - h) / 2`. The width never changes.
pub fn fit_height(img: &RgbImage, height: u32) -> Result<RgbImage> {
    let (width, current) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::InvalidImage { width, height });
    }

    let fitted = match HeightPlan::for_heights(current, height) {
        HeightPlan::Crop { top } => {
            tracing::debug!(current, height, top, "Cropping");
            imageops::crop_imm(img, 0, top, width, height).to_image()
        }
        HeightPlan::Pad { top } => {
            tracing::debug!(current, height, top, "Padding");
            let mut canvas = RgbImage::from_pixel(width, height, PAD_COLOR);
            imageops::replace(&mut canvas, img, 0, i64::from(top));
            canvas
        }
    };
    Ok(fitted)
}

/// Resize to the target width, then crop or pad to the target height.
pub fn normalize(img: &RgbImage, target: TargetSize) -> Result<RgbImage> {
    let resized = resize_to_width(img, target.width)?;
    fit_height(&resized, target.height)
}

/// Decode `source`, normalize it and write the JPEG to `output`.
///
/// Returns the dimensions of the written image.
pub fn normalize_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &NormalizeConfig,
) -> Result<Dimensions> {
    let img = backend.decode(source)?;
    let normalized = normalize(&img, config.target)?;
    backend.write_jpeg(output, &normalized, &config.encode)?;
    Ok(Dimensions::of(&normalized))
}
