//! Minimal JFIF APP0 reader.
//!
//! Extracts the pixel density the encoder stamped into a JPEG:
//!
//! ```text
//! FF E0 <len:u16> "JFIF\0" <major:u8> <minor:u8> <units:u8>
//!       <Xdensity:u16> <Ydensity:u16> <thumb_w:u8> <thumb_h:u8> ...
//! ```
//!
//! `units` is 0 for a bare aspect ratio, 1 for pixels per inch and 2 for
//! pixels per centimetre. Only the marker segments before the first SOS are
//! scanned.

use std::path::Path;

/// Unit of the JFIF density fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityUnit {
    AspectRatio,
    PixelsPerInch,
    PixelsPerCentimeter,
}

impl DensityUnit {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::AspectRatio),
            1 => Some(Self::PixelsPerInch),
            2 => Some(Self::PixelsPerCentimeter),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AspectRatio => "aspect ratio",
            Self::PixelsPerInch => "pixels/inch",
            Self::PixelsPerCentimeter => "pixels/cm",
        }
    }
}

/// Density fields of a JFIF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifDensity {
    pub major_version: u8,
    pub minor_version: u8,
    pub unit: DensityUnit,
    pub x: u16,
    pub y: u16,
}

const JFIF_IDENTIFIER: &[u8] = b"JFIF\0";

/// Read the JFIF density from a file. Returns `None` on any read or parse failure.
pub fn read_density_from_file(path: &Path) -> Option<JfifDensity> {
    let bytes = std::fs::read(path).ok()?;
    read_density(&bytes)
}

/// Read the JFIF density from JPEG bytes.
pub fn read_density(data: &[u8]) -> Option<JfifDensity> {
    // SOI
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];

        // Fill bytes between markers
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Markers without length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        // SOS (0xDA) means entropy-coded data starts; EOI ends the image
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());

        if marker == 0xE0 {
            if let Some(density) = parse_app0(&data[seg_start..seg_end]) {
                return Some(density);
            }
        }

        pos += 2 + seg_len;
    }

    None
}

fn parse_app0(segment: &[u8]) -> Option<JfifDensity> {
    let body = segment.strip_prefix(JFIF_IDENTIFIER)?;
    if body.len() < 7 {
        return None;
    }
    Some(JfifDensity {
        major_version: body[0],
        minor_version: body[1],
        unit: DensityUnit::from_byte(body[2])?,
        x: u16::from_be_bytes([body[3], body[4]]),
        y: u16::from_be_bytes([body[5], body[6]]),
    })
}
