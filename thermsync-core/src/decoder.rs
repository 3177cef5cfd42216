//! Cell and fragment decoding

use crate::constants::F64_CELL_WIDTH;
use crate::error::{ConfigError, FragmentError};
use crate::fragment::{FragmentHeader, FragmentLayout};
use crate::types::{Endianness, Frame, FrameGeometry};
use crate::validator::FrameValidator;
use alloc::vec::Vec;

/// A decoded cell at its wire precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Cell {
    F32(f32),
    F64(f64),
}

impl Cell {
    /// Check against the validator before any narrowing
    #[inline]
    fn plausible(self, validator: &FrameValidator) -> bool {
        match self {
            Cell::F32(v) => validator.accepts(v),
            Cell::F64(v) => validator.accepts_f64(v),
        }
    }

    #[inline]
    fn narrow(self) -> f32 {
        match self {
            Cell::F32(v) => v,
            Cell::F64(v) => v as f32,
        }
    }
}

/// Decode one float cell. `cell` must be exactly 4 or 8 bytes, as
/// produced by `chunks_exact(cell_byte_width)` on a validated geometry.
#[inline]
pub(crate) fn decode_cell(cell: &[u8], endianness: Endianness) -> Cell {
    if cell.len() == F64_CELL_WIDTH {
        let raw = [
            cell[0], cell[1], cell[2], cell[3], cell[4], cell[5], cell[6], cell[7],
        ];
        Cell::F64(match endianness {
            Endianness::Little => f64::from_le_bytes(raw),
            Endianness::Big => f64::from_be_bytes(raw),
        })
    } else {
        let raw = [cell[0], cell[1], cell[2], cell[3]];
        Cell::F32(match endianness {
            Endianness::Little => f32::from_le_bytes(raw),
            Endianness::Big => f32::from_be_bytes(raw),
        })
    }
}

/// Decode a window into a frame if every cell passes the validator
///
/// Stops at the first implausible cell, so a misaligned window usually
/// costs a single cell decode. `window` must be at least one frame long;
/// bytes past the frame length are ignored.
pub fn decode_plausible(
    geometry: &FrameGeometry,
    validator: &FrameValidator,
    window: &[u8],
) -> Option<Frame> {
    let frame_len = geometry.frame_byte_length();
    if window.len() < frame_len {
        return None;
    }

    let mut values = Vec::with_capacity(geometry.cell_count());
    for cell in window[..frame_len].chunks_exact(geometry.cell_byte_width) {
        let cell = decode_cell(cell, geometry.endianness);
        if !cell.plausible(validator) {
            return None;
        }
        values.push(cell.narrow());
    }

    Some(Frame::from_parts(geometry.rows, geometry.cols, values))
}

/// Decode exactly one frame without plausibility checks
pub fn decode_frame(geometry: &FrameGeometry, data: &[u8]) -> Result<Frame, ConfigError> {
    let frame_len = geometry.frame_byte_length();
    if data.len() != frame_len {
        return Err(ConfigError::ValueCountMismatch {
            expected: frame_len,
            actual: data.len(),
        });
    }

    let values = data
        .chunks_exact(geometry.cell_byte_width)
        .map(|cell| decode_cell(cell, geometry.endianness).narrow())
        .collect();

    Ok(Frame::from_parts(geometry.rows, geometry.cols, values))
}

/// Read one signed fixed-point value of 1, 2 or 4 bytes
#[inline]
fn decode_fixed(raw: &[u8], endianness: Endianness) -> i32 {
    match (raw.len(), endianness) {
        (1, _) => raw[0] as i8 as i32,
        (2, Endianness::Little) => i16::from_le_bytes([raw[0], raw[1]]) as i32,
        (2, Endianness::Big) => i16::from_be_bytes([raw[0], raw[1]]) as i32,
        (_, Endianness::Little) => i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
        (_, Endianness::Big) => i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
    }
}

/// Parse a fragment's header and raw values
///
/// Only the length is checked here; index range depends on the configured
/// fragment count and is checked by the reassembler.
pub fn decode_fragment(
    layout: &FragmentLayout,
    raw: &[u8],
) -> Result<(FragmentHeader, Vec<i32>), FragmentError> {
    let expected = layout.expected_len();
    if raw.len() != expected {
        return Err(FragmentError::MalformedFragment {
            expected,
            actual: raw.len(),
        });
    }

    let reserved = match (layout.reserved_width, layout.endianness) {
        (1, _) => raw[2] as u16,
        (_, Endianness::Little) => u16::from_le_bytes([raw[2], raw[3]]),
        (_, Endianness::Big) => u16::from_be_bytes([raw[2], raw[3]]),
    };

    let header = FragmentHeader {
        protocol: raw[0],
        half_index: raw[1],
        reserved,
    };

    let start = layout.header_len();
    let end = start + layout.value_count * layout.value_width;
    let values = raw[start..end]
        .chunks_exact(layout.value_width)
        .map(|v| decode_fixed(v, layout.endianness))
        .collect();

    Ok((header, values))
}
