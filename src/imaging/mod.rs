//! Image processing — pure Rust, built on the `image` crate.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (alpha flattened onto white) |
//! | **Resizer** | `imageops::resize` with Lanczos3 |
//! | **Canvas Normalizer** | `imageops::crop_imm` / `imageops::replace` on a white canvas |
//! | **Encoder** | `JpegEncoder` with JFIF pixel density + explicit quality |
//! | **Inspect** | custom JFIF APP0 reader |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for output geometry (unit testable)
//! - **Parameters**: Target size, DPI and quality types
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Resizer, Canvas Normalizer and the per-file pipeline
//! - **Encode / JFIF**: JPEG output and the density reader used to verify it

pub mod backend;
mod calculations;
pub mod encode;
pub mod jfif;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{Dimensions, ImageBackend, ImagingError};
pub use calculations::{HeightPlan, scaled_height};
pub use encode::{encode_jpeg, encode_jpeg_to_vec, jpeg_encoder_available, save_jpeg};
pub use jfif::{DensityUnit, JfifDensity, read_density, read_density_from_file};
pub use operations::{NormalizeConfig, fit_height, normalize, normalize_file, resize_to_width};
pub use params::{Dpi, EncodeParams, Quality, TargetSize};
pub use rust_backend::{RustBackend, is_supported_input, supported_input_extensions};
