//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. The
//! [`operations`](super::operations) module consumes [`TargetSize`] and the
//! [`encode`](super::encode) module consumes [`EncodeParams`].
//!
//! ## Types
//!
//! - [`TargetSize`] — Exact output dimensions (width × height).
//! - [`Dpi`] — Print density stamped into the JFIF header. `0` means "do not stamp".
//! - [`Quality`] — Lossy compression factor. Non-positive means "encoder default".
//! - [`EncodeParams`] — DPI + quality bundle handed to the encoder.

/// Exact output dimensions for the normalized raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel density applied to both axes, in pixels per inch.
///
/// The JFIF density fields are 16 bits wide, so the value is a `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dpi(pub u16);

impl Dpi {
    /// Leave the encoder's density fields untouched.
    pub const NONE: Dpi = Dpi(0);

    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// The density to stamp, or `None` when stamping is disabled.
    pub fn value(self) -> Option<u16> {
        (self.0 > 0).then_some(self.0)
    }
}

/// Compression quality for the JPEG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// Let the encoder pick its default.
    #[default]
    Default,
    /// Explicit quality percentage (1-100).
    Explicit(u8),
}

impl Quality {
    /// Map a compression factor to an encoder quality.
    ///
    /// `factor <= 0` (or NaN) selects the encoder default. Positive factors are
    /// scaled to a percentage and clamped to `1..=100`, so `0.6` becomes `60`
    /// and anything above `1.0` becomes `100`.
    pub fn from_factor(factor: f32) -> Self {
        if factor.is_nan() || factor <= 0.0 {
            return Self::Default;
        }
        let percent = (factor * 100.0).round().clamp(1.0, 100.0);
        Self::Explicit(percent as u8)
    }

    /// The explicit percentage, if one was requested.
    pub fn percent(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Explicit(p) => Some(p),
        }
    }
}

/// Everything the encoder needs besides the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    pub dpi: Dpi,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_factor_maps_to_percent() {
        assert_eq!(Quality::from_factor(0.6), Quality::Explicit(60));
        assert_eq!(Quality::from_factor(1.0), Quality::Explicit(100));
        assert_eq!(Quality::from_factor(0.755), Quality::Explicit(76));
    }

    #[test]
    fn quality_non_positive_is_default() {
        assert_eq!(Quality::from_factor(0.0), Quality::Default);
        assert_eq!(Quality::from_factor(-0.5), Quality::Default);
        assert_eq!(Quality::from_factor(f32::NAN), Quality::Default);
        assert_eq!(Quality::Default.percent(), None);
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::from_factor(0.001).percent(), Some(1));
        assert_eq!(Quality::from_factor(3.0).percent(), Some(100));
    }

    #[test]
    fn dpi_zero_disables_stamping() {
        assert_eq!(Dpi::NONE.value(), None);
        assert_eq!(Dpi::new(72).value(), Some(72));
    }
}
