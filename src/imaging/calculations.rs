//! Pure calculation functions for output geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height of a raster scaled to `target_width`, preserving aspect ratio.
///
/// Rounds to the nearest pixel and never returns 0, so extremely wide
/// sources still produce a one-pixel-high strip.
///
/// # Examples
/// ```
/// # use pagefit::imaging::scaled_height;
/// // 2000x2764 at width 1000 → 1382
/// assert_eq!(scaled_height(2000, 2764, 1000), 1382);
///
/// // 500x900 at width 1000 → 1800
/// assert_eq!(scaled_height(500, 900, 1000), 1800);
/// ```
pub fn scaled_height(src_width: u32, src_height: u32, target_width: u32) -> u32 {
    let h = (target_width as f64 * src_height as f64 / src_width as f64).round();
    (h as u32).max(1)
}

/// How the Canvas Normalizer reaches the target height.
///
/// `top` is the row offset of the kept region (crop) or of the drawn content
/// (pad). Both use floor division, so an odd margin leaves the extra row at
/// the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightPlan {
    /// Source is taller: keep rows `top..top + target`.
    Crop { top: u32 },
    /// Source is shorter or equal: draw it at row `top` on a white canvas.
    Pad { top: u32 },
}

impl HeightPlan {
    pub fn for_heights(current: u32, target: u32) -> Self {
        if current > target {
            HeightPlan::Crop {
                top: (current - target) / 2,
            }
        } else {
            HeightPlan::Pad {
                top: (target - current) / 2,
            }
        }
    }
}
