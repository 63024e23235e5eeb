//! Shared test utilities for the pagefit test suite.
//!
//! Synthetic rasters with predictable pixels, plus helpers that put them on
//! disk in a temp directory so the batch driver has something to walk.

use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory rasters
// =========================================================================

/// Smooth diagonal gradient; every pixel differs from its neighbours.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Each row carries its own index, so crop offsets can be read back.
pub fn row_striped(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |_, y| {
        Rgb([(y % 256) as u8, (y / 256 % 256) as u8, 7])
    })
}

// =========================================================================
// Files on disk
// =========================================================================

/// Write a gradient JPEG (default quality, no density) to `path`.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a gradient PNG to `path`.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height).save(path).unwrap();
}

/// Write a fully transparent RGBA PNG to `path`.
pub fn write_transparent_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
        .save(path)
        .unwrap();
}
