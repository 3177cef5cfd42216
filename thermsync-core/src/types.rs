//! Core types for Thermsync frames

use crate::constants::{
    DEFAULT_COLS, DEFAULT_MAX_TEMP, DEFAULT_MIN_TEMP, DEFAULT_ROWS, F32_CELL_WIDTH,
    F64_CELL_WIDTH,
};
use crate::error::ConfigError;
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Byte order of multi-byte wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// Least significant byte first (the sensor firmware's native order)
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

/// Shape and byte encoding of one serial frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    /// Pixel rows
    pub rows: usize,

    /// Pixel columns
    pub cols: usize,

    /// Bytes per cell (4 for `f32`, 8 for `f64`)
    pub cell_byte_width: usize,

    /// Byte order of each cell
    pub endianness: Endianness,
}

impl FrameGeometry {
    /// Create a validated geometry
    pub fn new(
        rows: usize,
        cols: usize,
        cell_byte_width: usize,
        endianness: Endianness,
    ) -> Result<Self, ConfigError> {
        let geometry = Self {
            rows,
            cols,
            cell_byte_width,
            endianness,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Geometry of the MLX90641 serial stream: 12x16 little-endian `f32`
    pub const fn mlx90641() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            cell_byte_width: F32_CELL_WIDTH,
            endianness: Endianness::Little,
        }
    }

    /// Validate the geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGeometry {
                rows: self.rows,
                cols: self.cols,
            });
        }

        if self.cell_byte_width != F32_CELL_WIDTH && self.cell_byte_width != F64_CELL_WIDTH {
            return Err(ConfigError::UnsupportedCellWidth(self.cell_byte_width));
        }

        Ok(())
    }

    /// Number of cells in one frame
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Encoded length of one frame in bytes
    pub const fn frame_byte_length(&self) -> usize {
        self.rows * self.cols * self.cell_byte_width
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::mlx90641()
    }
}

/// Closed range of physically plausible readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempRange {
    /// Lowest accepted value
    pub min: f32,

    /// Highest accepted value
    pub max: f32,
}

impl TempRange {
    /// Create a validated range
    pub fn new(min: f32, max: f32) -> Result<Self, ConfigError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Validate the range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Check whether `value` lies within `[min, max]`
    ///
    /// NaN never lies within any range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for TempRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_TEMP,
            max: DEFAULT_MAX_TEMP,
        }
    }
}

/// One rectangular grid of temperatures in degrees, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl Frame {
    /// Create a frame, checking that `values` fills `rows x cols`
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self, ConfigError> {
        if values.len() != rows * cols {
            return Err(ConfigError::ValueCountMismatch {
                expected: rows * cols,
                actual: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Create a frame from nested rows; every row must have the same length
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, ConfigError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().find(|row| row.len() != cols) {
            return Err(ConfigError::ValueCountMismatch {
                expected: cols,
                actual: ragged.len(),
            });
        }
        let values: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::new(rows.len(), cols, values)
    }

    /// Frame filled with a single value
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        Self { rows, cols, values }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All values in row-major order
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.values.get(start..start + self.cols)
    }

    /// Iterate over rows
    pub fn rows_iter(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks() panics on zero
        self.values.chunks(self.cols.max(1))
    }

    /// Lowest value, or `None` for an empty frame
    pub fn min(&self) -> Option<f32> {
        self.values.iter().copied().reduce(f32::min)
    }

    /// Highest value, or `None` for an empty frame
    pub fn max(&self) -> Option<f32> {
        self.values.iter().copied().reduce(f32::max)
    }

    /// Mean of each column, as the firmware computes for the notification strip
    pub fn column_averages(&self) -> Vec<f32> {
        if self.rows == 0 {
            return vec![0.0; self.cols];
        }
        let mut sums = vec![0.0f32; self.cols];
        for row in self.rows_iter() {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += *value;
            }
        }
        let rows = self.rows as f32;
        sums.into_iter().map(|sum| sum / rows).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_frame_length() {
        let geometry = FrameGeometry::mlx90641();
        assert_eq!(geometry.cell_count(), 192);
        assert_eq!(geometry.frame_byte_length(), 768);
    }

    #[test]
    fn test_geometry_rejects_bad_width() {
        let err = FrameGeometry::new(2, 2, 3, Endianness::Little).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedCellWidth(3));
    }

    #[test]
    fn test_geometry_rejects_empty() {
        assert!(FrameGeometry::new(0, 16, 4, Endianness::Little).is_err());
    }

    #[test]
    fn test_range_contains_bounds() {
        let range = TempRange::new(-40.0, 150.0).unwrap();
        assert!(range.contains(-40.0));
        assert!(range.contains(150.0));
        assert!(!range.contains(150.01));
        assert!(!range.contains(f32::NAN));
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(TempRange::new(10.0, -10.0).is_err());
        assert!(TempRange::new(f32::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(frame.shape(), (2, 3));
        assert_eq!(frame.get(1, 2), Some(6.0));
        assert_eq!(frame.get(2, 0), None);
        assert_eq!(frame.row(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(frame.min(), Some(1.0));
        assert_eq!(frame.max(), Some(6.0));
        assert_eq!(frame.column_averages(), vec![2.5, 3.5, 4.5]);
    }

    #[test]
    fn test_frame_shape_mismatch() {
        let err = Frame::new(2, 2, vec![1.0; 3]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ValueCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }
}
