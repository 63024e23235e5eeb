//! JPEG encoding with JFIF density and explicit quality.
//!
//! The density is written through the encoder's own JFIF APP0 header
//! (`JpegEncoder::set_pixel_density`) rather than a separate EXIF block, so
//! viewers that read the standard JFIF fields see the DPI.

use super::backend::ImagingError;
use super::params::EncodeParams;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageFormat, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Whether the `image` crate was built with a JPEG encoder.
pub fn jpeg_encoder_available() -> bool {
    ImageFormat::Jpeg.writing_enabled()
}

/// Encode `img` as JPEG into `writer`.
pub fn encode_jpeg<W: Write>(
    writer: W,
    img: &RgbImage,
    params: &EncodeParams,
) -> Result<(), ImagingError> {
    if !jpeg_encoder_available() {
        return Err(ImagingError::MissingEncoder);
    }

    let mut encoder = match params.quality.percent() {
        Some(q) => JpegEncoder::new_with_quality(writer, q),
        None => JpegEncoder::new(writer),
    };
    if let Some(dpi) = params.dpi.value() {
        encoder.set_pixel_density(PixelDensity::dpi(dpi));
    }

    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(encode_error)
}

/// Encode `img` into an in-memory JPEG.
pub fn encode_jpeg_to_vec(img: &RgbImage, params: &EncodeParams) -> Result<Vec<u8>, ImagingError> {
    let mut bytes = Vec::new();
    encode_jpeg(&mut bytes, img, params)?;
    Ok(bytes)
}

/// Write `img` to `path` as JPEG.
///
/// The image is encoded in memory first; `path` is only touched once the
/// encoder has accepted it, so an encode failure leaves any existing file
/// intact. A stale file is then removed and the bytes written through a
/// buffered writer that is flushed explicitly, so late write failures come
/// back as [`ImagingError::Io`] instead of being swallowed on drop.
pub fn save_jpeg(path: &Path, img: &RgbImage, params: &EncodeParams) -> Result<(), ImagingError> {
    let bytes = encode_jpeg_to_vec(img, params)?;

    remove_stale(path)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), ImagingError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed stale output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ImagingError::Io(e)),
    }
}

fn encode_error(e: ImageError) -> ImagingError {
    match e {
        ImageError::IoError(io) => ImagingError::Io(io),
        other => ImagingError::Encode(other.to_string()),
    }
}
