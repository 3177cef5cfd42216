//! Fragment layouts and headers for the notification transport
//!
//! Every fragment starts with a protocol byte and an index byte, followed by
//! a reserved field whose width depends on the firmware revision, then a
//! fixed number of signed fixed-point values and optional padding.

use crate::constants::{
    COLUMN_STRIP_LEN, DEFAULT_FRAGMENT_WIDTH, FRAGMENT_HEADER_PREFIX, INTERLEAVED_PAIR_LEN,
    INTERLEAVED_PAIR_VALUES,
};
use crate::error::ConfigError;
use crate::types::Endianness;
use serde::{Deserialize, Serialize};

/// How a fragment's values map onto the columns of the live buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Fragment `i` fills columns `[i * width, (i + 1) * width)`
    Contiguous,
    /// Fragment `i` of `n` fills columns `i, i + n, i + 2n, ...`
    Strided,
}

impl Placement {
    /// Column of the `value`-th value of fragment `index`
    #[inline]
    pub const fn column(&self, index: usize, value: usize, count: usize, width: usize) -> usize {
        match self {
            Placement::Contiguous => index * width + value,
            Placement::Strided => index + value * count,
        }
    }
}

/// Byte layout of one fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentLayout {
    /// Width of the reserved header field (1 or 2 bytes)
    pub reserved_width: usize,

    /// Values carried per fragment
    pub value_count: usize,

    /// Bytes per fixed-point value (1, 2 or 4, signed)
    pub value_width: usize,

    /// Zero bytes after the values
    pub trailing_padding: usize,

    /// Byte order of multi-byte fields
    pub endianness: Endianness,

    /// Column mapping
    pub placement: Placement,
}

impl FragmentLayout {
    /// `<u8 protocol, u8 index, u8 reserved, 8 x i16>`: 19 bytes, contiguous halves
    pub const fn column_strip() -> Self {
        Self {
            reserved_width: 1,
            value_count: DEFAULT_FRAGMENT_WIDTH,
            value_width: 2,
            trailing_padding: 0,
            endianness: Endianness::Little,
            placement: Placement::Contiguous,
        }
    }

    /// `<u8 protocol, u8 index, u16 reserved, 6 x i16, 4 pad>`: 20 bytes, even/odd columns
    pub const fn interleaved_pair() -> Self {
        Self {
            reserved_width: 2,
            value_count: INTERLEAVED_PAIR_VALUES,
            value_width: 2,
            trailing_padding: 4,
            endianness: Endianness::Little,
            placement: Placement::Strided,
        }
    }

    /// Validate the layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.reserved_width, 1 | 2) {
            return Err(ConfigError::UnsupportedReservedWidth(self.reserved_width));
        }
        if !matches!(self.value_width, 1 | 2 | 4) {
            return Err(ConfigError::UnsupportedValueWidth(self.value_width));
        }
        if self.value_count == 0 {
            return Err(ConfigError::FragmentWidthMismatch {
                width: 0,
                value_count: 0,
            });
        }
        Ok(())
    }

    /// Bytes before the first value
    pub const fn header_len(&self) -> usize {
        FRAGMENT_HEADER_PREFIX + self.reserved_width
    }

    /// Total fragment length in bytes
    pub const fn expected_len(&self) -> usize {
        self.header_len() + self.value_count * self.value_width + self.trailing_padding
    }
}

impl Default for FragmentLayout {
    fn default() -> Self {
        Self::column_strip()
    }
}

/// Leading fields of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FragmentHeader {
    /// Firmware protocol revision
    pub protocol: u8,

    /// Slot this fragment refreshes
    pub half_index: u8,

    /// Reserved field, widened to `u16`
    pub reserved: u16,
}

impl FragmentHeader {
    /// Header for slot `half_index` with the current protocol byte
    pub const fn new(half_index: u8) -> Self {
        Self {
            protocol: crate::constants::PROTOCOL_VERSION,
            half_index,
            reserved: 0,
        }
    }

    /// Slot index as `usize`
    pub const fn index(&self) -> usize {
        self.half_index as usize
    }
}

// Compile-time check that the presets agree with the documented sizes
const _: () = assert!(FragmentLayout::column_strip().expected_len() == COLUMN_STRIP_LEN);
const _: () = assert!(FragmentLayout::interleaved_pair().expected_len() == INTERLEAVED_PAIR_LEN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lengths() {
        assert_eq!(FragmentLayout::column_strip().expected_len(), 19);
        assert_eq!(FragmentLayout::column_strip().header_len(), 3);
        assert_eq!(FragmentLayout::interleaved_pair().expected_len(), 20);
        assert_eq!(FragmentLayout::interleaved_pair().header_len(), 4);
    }

    #[test]
    fn test_placement_columns() {
        assert_eq!(Placement::Contiguous.column(1, 3, 2, 8), 11);
        assert_eq!(Placement::Strided.column(0, 3, 2, 6), 6);
        assert_eq!(Placement::Strided.column(1, 3, 2, 6), 7);
    }

    #[test]
    fn test_layout_rejects_odd_widths() {
        let mut layout = FragmentLayout::column_strip();
        layout.value_width = 3;
        assert_eq!(layout.validate(), Err(ConfigError::UnsupportedValueWidth(3)));

        let mut layout = FragmentLayout::column_strip();
        layout.reserved_width = 4;
        assert_eq!(layout.validate(), Err(ConfigError::UnsupportedReservedWidth(4)));
    }
}
