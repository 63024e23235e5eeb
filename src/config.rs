//! Run configuration.
//!
//! Handles loading, validating, and merging `pagefit.toml`. Values are
//! layered: stock defaults, then the config file, then command-line flags.
//! Each layer only needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [target]
//! width = 1000     # Output width in pixels
//! height = 1384    # Output height in pixels (cropped or padded, centred)
//!
//! [jpeg]
//! dpi = 72         # Density stamped into the JFIF header (0 = leave unset)
//! quality = 0.6    # Compression factor in (0, 1] (0 = encoder default)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dpi, EncodeParams, NormalizeConfig, Quality, TargetSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "pagefit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Run configuration loaded from `pagefit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output geometry.
    pub target: TargetConfig,
    /// JPEG encoder settings.
    pub jpeg: JpegConfig,
}

/// Output geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Width every output is resized to.
    pub width: u32,
    /// Height every output is cropped or padded to.
    pub height: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1384,
        }
    }
}

/// JPEG encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegConfig {
    /// Pixels per inch on both axes. 0 leaves the density fields unset.
    pub dpi: u32,
    /// Compression factor. 0 or below uses the encoder default.
    pub quality: f32,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            dpi: 72,
            quality: 0.6,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(ConfigError::Validation(
                "target.width and target.height must be non-zero".into(),
            ));
        }
        let max_side = u32::from(u16::MAX);
        if self.target.width > max_side || self.target.height > max_side {
            return Err(ConfigError::Validation(format!(
                "target.width and target.height must be at most {max_side} (JPEG limit)"
            )));
        }
        if self.jpeg.dpi > u32::from(u16::MAX) {
            return Err(ConfigError::Validation(format!(
                "jpeg.dpi must be at most {}",
                u16::MAX
            )));
        }
        if !self.jpeg.quality.is_finite() || self.jpeg.quality > 1.0 {
            return Err(ConfigError::Validation(
                "jpeg.quality must be a number no greater than 1".into(),
            ));
        }
        Ok(())
    }

    /// Convert to the parameters the imaging pipeline takes.
    ///
    /// Call after [`validate`](Self::validate); an out-of-range DPI saturates.
    pub fn normalize_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            target: TargetSize::new(self.target.width, self.target.height),
            encode: EncodeParams {
                dpi: Dpi::new(u16::try_from(self.jpeg.dpi).unwrap_or(u16::MAX)),
                quality: Quality::from_factor(self.jpeg.quality),
            },
        }
    }
}

/// Command-line overrides, applied on top of file values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dpi: Option<u32>,
    pub quality: Option<f32>,
}

impl Overrides {
    /// Express the set flags as a sparse TOML table.
    pub fn to_toml(&self) -> Option<toml::Value> {
        let mut target = toml::Table::new();
        if let Some(w) = self.width {
            target.insert("width".into(), toml::Value::Integer(w.into()));
        }
        if let Some(h) = self.height {
            target.insert("height".into(), toml::Value::Integer(h.into()));
        }

        let mut jpeg = toml::Table::new();
        if let Some(d) = self.dpi {
            jpeg.insert("dpi".into(), toml::Value::Integer(d.into()));
        }
        if let Some(q) = self.quality {
            jpeg.insert("quality".into(), toml::Value::Float(q.into()));
        }

        let mut root = toml::Table::new();
        if !target.is_empty() {
            root.insert("target".into(), toml::Value::Table(target));
        }
        if !jpeg.is_empty() {
            root.insert("jpeg".into(), toml::Value::Table(jpeg));
        }
        (!root.is_empty()).then_some(toml::Value::Table(root))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `pagefit.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no config file exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    load_raw_config_file(&config_path).map(Some)
}

/// Merge the overlays in order onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `pagefit.toml` from the given directory over stock defaults.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Full resolution used by the CLI: defaults → file → flags.
///
/// With an explicit `file`, that file must exist. Otherwise `pagefit.toml`
/// in `dir` is used when present.
pub fn load_layered(
    dir: &Path,
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let file_layer = match file {
        Some(path) => Some(load_raw_config_file(path)?),
        None => load_raw_config(dir)?,
    };
    resolve_config(
        stock_defaults_value(),
        file_layer.into_iter().chain(overrides.to_toml()),
    )
}

/// Returns a fully-commented stock `pagefit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagefit configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--width, --height, --dpi, --quality) override
# anything set here. Unknown keys will cause an error.

[target]
# Every output is resized to this width, keeping the aspect ratio
# (Lanczos3 resampling).
width = 1000
# Then cropped (taller images) or padded with white (shorter images) to
# exactly this height. Both are centred; an odd margin puts the extra
# row at the bottom.
height = 1384

[jpeg]
# Print density written to the JFIF header, in pixels per inch.
# 0 leaves the header's density unset.
dpi = 72
# Compression factor: 1.0 favours quality, values near 0 favour size.
# 0 (or negative) uses the encoder default.
quality = 0.6
"##
}
