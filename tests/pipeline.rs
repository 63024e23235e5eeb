//! End-to-end tests through the public API with the real `image` backend.
//!
//! Run with: cargo test --test pipeline

use image::{ImageEncoder, Rgb, RgbImage};
use pagefit::config::Config;
use pagefit::imaging::{
    DensityUnit, ImagingError, RustBackend, normalize_file, read_density_from_file,
};
use pagefit::process::{BatchPaths, ProcessError, process};
use std::path::Path;
use tempfile::TempDir;

fn page(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if (x / 40 + y / 40) % 2 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 225, 210])
        }
    })
}

fn write_png(path: &Path, width: u32, height: u32) {
    page(width, height).save(path).unwrap();
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = page(width, height);
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new_with_quality(std::io::BufWriter::new(file), 95)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

#[test]
fn print_profile_scenario() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("scan.png");
    let output = tmp.path().join("scan.jpg");
    write_png(&source, 2000, 2764);

    let config = Config::default().normalize_config();
    let dims = normalize_file(&RustBackend::new(), &source, &output, &config).unwrap();
    assert_eq!((dims.width, dims.height), (1000, 1384));

    let decoded = image::open(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1000, 1384));

    let density = read_density_from_file(&output).unwrap();
    assert_eq!(density.unit, DensityUnit::PixelsPerInch);
    assert_eq!((density.x, density.y), (72, 72));

    let uncompressed = 1000 * 1384 * 3;
    let written = std::fs::metadata(&output).unwrap().len();
    assert!(written < uncompressed, "{written} >= {uncompressed}");
}

#[test]
fn narrow_source_is_cropped_from_centre() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("tall.png");
    let output = tmp.path().join("tall.jpg");
    write_png(&source, 500, 900);

    let config = Config::default().normalize_config();
    let dims = normalize_file(&RustBackend::new(), &source, &output, &config).unwrap();
    assert_eq!((dims.width, dims.height), (1000, 1384));
}

#[test]
fn short_source_is_padded_with_white() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.png");
    let output = tmp.path().join("wide.jpg");
    write_png(&source, 2000, 1000);

    let config = Config::default().normalize_config();
    normalize_file(&RustBackend::new(), &source, &output, &config).unwrap();

    // 1000x500 drawn at rows 442..942 of 1384; top and bottom bands are white.
    let decoded = image::open(&output).unwrap().into_rgb8();
    for &(x, y) in &[(10, 10), (500, 200), (5, 436), (5, 952), (990, 1370), (500, 1200)] {
        let p = decoded.get_pixel(x, y);
        assert!(p.0.iter().all(|&c| c >= 235), "pixel ({x},{y}) = {p:?}");
    }
    // The first and last content rows start on dark checker tiles.
    for &(x, y) in &[(5, 447), (5, 936)] {
        let p = decoded.get_pixel(x, y);
        assert!(p.0.iter().all(|&c| c <= 80), "pixel ({x},{y}) = {p:?}");
    }
}

#[test]
fn batch_run_skips_corrupt_files() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("originals");
    std::fs::create_dir(&input).unwrap();
    write_jpeg(&input.join("001.jpg"), 1200, 1600);
    write_png(&input.join("002.png"), 800, 600);
    std::fs::write(input.join("003.jpg"), b"not an image").unwrap();
    std::fs::write(input.join("readme.txt"), b"ignored").unwrap();

    let paths = BatchPaths {
        input_dir: input,
        output_dir: tmp.path().join("api"),
        reference_dir: None,
    };
    let report = process(&paths, &Config::default().normalize_config(), None).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].source.ends_with("003.jpg"));

    for name in ["001.jpg", "002.jpg"] {
        let out = tmp.path().join("api").join(name);
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (1000, 1384));
    }
    assert!(!tmp.path().join("api").join("003.jpg").exists());
    assert!(report.written.iter().all(|w| w.sizes.output > 0));
}

#[test]
fn batch_run_missing_input_dir() {
    let tmp = TempDir::new().unwrap();
    let paths = BatchPaths {
        input_dir: tmp.path().join("missing"),
        output_dir: tmp.path().join("out"),
        reference_dir: None,
    };
    let err = process(&paths, &Config::default().normalize_config(), None).unwrap_err();
    assert!(matches!(err, ProcessError::InputNotFound(_)));
}

#[test]
fn decode_failure_is_per_file_error() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("garbage.png");
    std::fs::write(&source, b"\x89PNG\r\n\x1a\ntruncated").unwrap();

    let err = normalize_file(
        &RustBackend::new(),
        &source,
        &tmp.path().join("garbage.jpg"),
        &Config::default().normalize_config(),
    )
    .unwrap_err();
    assert!(matches!(err, ImagingError::Decode { .. }));
    assert!(!err.aborts_run());
}
