//! # pagefit
//!
//! Normalizes arbitrary input images into fixed-size JPEGs for a print or
//! publishing pipeline: every page comes out at exactly the same pixel
//! dimensions, with the same JFIF density and the same compression.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! decode ─→ Resizer (width) ─→ Canvas Normalizer (height) ─→ Encoder (dpi, quality) ─→ file
//! ```
//!
//! - **Resizer** scales to the target width, keeping the aspect ratio, with
//!   Lanczos3 resampling so text and line art stay sharp.
//! - **Canvas Normalizer** crops taller rasters and pads shorter ones onto
//!   white, centring vertically. The top offset is floor-divided, so an odd
//!   margin puts the extra row at the bottom.
//! - **Encoder** writes JPEG with an explicit quality and stamps the density
//!   into the JFIF header.
//!
//! Each stage takes a borrowed raster and returns a freshly allocated one; no
//! stage ever returns a view into its input. The stages hold no state, so
//! files are independent of one another.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | The pipeline stages, the decoder/sink backend, JFIF inspection |
//! | [`process`] | Batch driver — walks a directory, skips bad files, compares sizes |
//! | [`config`] | `pagefit.toml` loading, layering with CLI flags, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Density via JFIF, Not EXIF
//!
//! DPI is written through the JPEG encoder's own JFIF APP0 header rather than
//! an EXIF block. Every JPEG reader understands JFIF density, and the encoder
//! already emits the segment, so no extra metadata library is involved.
//!
//! ## Explicit Configuration
//!
//! Target size, DPI and quality are carried in a
//! [`NormalizeConfig`](imaging::NormalizeConfig) passed to every call instead of
//! process-wide constants, so tests and callers can vary them per call.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
