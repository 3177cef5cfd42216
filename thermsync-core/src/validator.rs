//! Physical plausibility check for candidate frames
//!
//! The serial wire format has no marker and no checksum. A window is
//! accepted as a real frame start only when every decoded value is finite
//! and inside the configured range. Garbage that happens to decode to
//! plausible values is accepted, and real frames with out-of-range
//! readings are skipped.

use crate::error::ConfigError;
use crate::types::TempRange;

/// Pure predicate over decoded readings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameValidator {
    range: TempRange,
}

impl FrameValidator {
    /// Create a validator for a checked range
    pub fn new(range: TempRange) -> Result<Self, ConfigError> {
        range.validate()?;
        Ok(Self { range })
    }

    /// The accepted range
    pub fn range(&self) -> TempRange {
        self.range
    }

    /// Check a single reading
    #[inline]
    pub fn accepts(&self, value: f32) -> bool {
        value.is_finite() && self.range.contains(value)
    }

    /// Check a single reading decoded from an 8-byte cell, at full width
    #[inline]
    pub fn accepts_f64(&self, value: f64) -> bool {
        value.is_finite() && value >= self.range.min as f64 && value <= self.range.max as f64
    }

    /// Check a whole candidate frame
    pub fn is_plausible(&self, values: &[f32]) -> bool {
        values.iter().all(|&v| self.accepts(v))
    }
}

impl Default for FrameValidator {
    fn default() -> Self {
        Self {
            range: TempRange::default(),
        }
    }
}
