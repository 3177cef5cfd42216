//! Construction-time configuration
//!
//! `SensorConfig` is the single configuration surface consumed by both
//! engines. Every invariant is checked by `validate()`; engines refuse to
//! initialize on any violation.

use crate::constants::{
    DEFAULT_FIXED_POINT_SCALE, DEFAULT_FRAGMENT_COUNT, DEFAULT_FRAGMENT_WIDTH,
    DEFAULT_MAX_RETAINED_FRAMES, MAX_FRAGMENT_COUNT,
};
use crate::error::ConfigError;
use crate::fragment::FragmentLayout;
use crate::types::{FrameGeometry, TempRange};
use serde::{Deserialize, Serialize};

/// Notification transport settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Number of fragments that make up one strip
    pub count: usize,

    /// Columns refreshed by one fragment
    pub width: usize,

    /// Multiplier from raw fixed-point values to degrees
    pub scale: f32,

    /// Byte layout of each fragment
    pub layout: FragmentLayout,
}

impl FragmentConfig {
    /// Validate counts, scale and layout agreement
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 || self.count > MAX_FRAGMENT_COUNT {
            return Err(ConfigError::InvalidFragmentCount(self.count));
        }

        self.layout.validate()?;

        if self.width == 0 || self.width != self.layout.value_count {
            return Err(ConfigError::FragmentWidthMismatch {
                width: self.width,
                value_count: self.layout.value_count,
            });
        }

        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        Ok(())
    }

    /// Columns in the reassembled strip
    pub const fn total_columns(&self) -> usize {
        self.count * self.width
    }

    /// Convert one raw fixed-point value to degrees
    #[inline]
    pub fn scale_value(&self, raw: i32) -> f32 {
        (raw as f64 * self.scale as f64) as f32
    }

    /// Nearest raw fixed-point value for `degrees`
    pub fn quantize(&self, degrees: f32) -> i32 {
        let raw = degrees as f64 / self.scale as f64;
        // `as` saturates; add half away from zero to round
        if raw >= 0.0 {
            (raw + 0.5) as i32
        } else {
            (raw - 0.5) as i32
        }
    }
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_FRAGMENT_COUNT,
            width: DEFAULT_FRAGMENT_WIDTH,
            scale: DEFAULT_FIXED_POINT_SCALE,
            layout: FragmentLayout::column_strip(),
        }
    }
}

/// Complete sensor link configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Serial frame geometry
    pub geometry: FrameGeometry,

    /// Plausible reading range
    pub range: TempRange,

    /// Retained buffer bound, in frame lengths
    pub max_retained_frames: usize,

    /// Notification transport settings
    pub fragments: FragmentConfig,
}

impl SensorConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.range.validate()?;
        if self.max_retained_frames == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        self.fragments.validate()
    }

    /// Retained buffer bound in bytes
    pub const fn max_retained_bytes(&self) -> usize {
        self.max_retained_frames * self.geometry.frame_byte_length()
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::mlx90641(),
            range: TempRange::default(),
            max_retained_frames: DEFAULT_MAX_RETAINED_FRAMES,
            fragments: FragmentConfig::default(),
        }
    }
}
