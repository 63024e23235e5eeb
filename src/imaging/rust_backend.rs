//! Pure Rust backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with content sniffing |
//! | Alpha flattening | per-pixel blend onto white |
//! | Encode → JPEG | [`save_jpeg`](super::encode::save_jpeg) (`JpegEncoder` + JFIF density) |

use super::backend::{Dimensions, ImageBackend, ImagingError};
use super::encode::save_jpeg;
use super::params::EncodeParams;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders may be compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension we can decode (case-insensitive).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// `image`-crate backend. See the [module docs](self) for the mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> ImagingError {
    ImagingError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Load and decode an image from disk, trusting content over extension.
fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Convert any decoded image to opaque 8-bit RGB.
///
/// Transparent pixels are composited onto white, the same colour the canvas
/// uses for padding, so a transparent PNG prints as a white page.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }
    let rgba = img.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let alpha = p[3] as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, ImagingError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<RgbImage, ImagingError> {
        let img = load_image(path)?;
        tracing::debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Decoded"
        );
        Ok(flatten_to_rgb(img))
    }

    fn write_jpeg(
        &self,
        path: &Path,
        img: &RgbImage,
        params: &EncodeParams,
    ) -> Result<(), ImagingError> {
        save_jpeg(path, img, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::jfif::{DensityUnit, read_density_from_file};
    use crate::imaging::params::{Dpi, Quality};
    use crate::test_helpers::{gradient, write_test_jpeg, write_test_png, write_transparent_png};
    use image::{Rgba, RgbaImage};

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp", "gif", "bmp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn supported_input_ignores_case_and_rejects_others() {
        assert!(is_supported_input(Path::new("scan.JPG")));
        assert!(is_supported_input(Path::new("dir/page.Png")));
        assert!(!is_supported_input(Path::new("notes.txt")));
        assert!(!is_supported_input(Path::new("no-extension")));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_test_jpeg(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn decode_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.png");
        write_test_png(&path, 30, 20);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img, gradient(30, 20));
    }

    #[test]
    fn decode_sniffs_content_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-png.jpg");
        write_test_png(&path, 12, 9);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions(), (12, 9));
    }

    #[test]
    fn decode_corrupt_file_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"\xFF\xD8 definitely not a jpeg").unwrap();

        let err = RustBackend::new().decode(&path).unwrap_err();
        assert!(matches!(err, ImagingError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn decode_missing_file_is_io_error() {
        let err = RustBackend::new()
            .decode(Path::new("/nonexistent/page.png"))
            .unwrap_err();
        assert!(matches!(err, ImagingError::Io(_)));
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("clear.png");
        write_transparent_png(&path, 4, 4);

        let img = RustBackend::new().decode(&path).unwrap();
        assert!(img.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn opaque_alpha_pixels_keep_colour() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let flat = flatten_to_rgb(DynamicImage::ImageRgba8(rgba));
        assert!(flat.pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    #[test]
    fn write_jpeg_stamps_density() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        let params = EncodeParams {
            dpi: Dpi::new(150),
            quality: Quality::from_factor(0.6),
        };

        RustBackend::new()
            .write_jpeg(&path, &gradient(50, 40), &params)
            .unwrap();

        let density = read_density_from_file(&path).unwrap();
        assert_eq!(density.unit, DensityUnit::PixelsPerInch);
        assert_eq!((density.x, density.y), (150, 150));
    }
}
