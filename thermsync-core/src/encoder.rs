//! Frame and fragment encoding
//!
//! The sensor firmware is the real producer of these bytes. The encoders
//! exist so that tests, demos and the simulator can generate exact wire
//! images.

use crate::constants::F64_CELL_WIDTH;
use crate::error::ConfigError;
use crate::fragment::{FragmentHeader, FragmentLayout};
use crate::types::{Endianness, FrameGeometry};
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};

/// Encode row-major readings as one serial frame
///
/// The frame is a bare sequence of `rows * cols` float cells in the
/// geometry's width and byte order, with no marker or trailer.
pub fn encode_frame(geometry: &FrameGeometry, values: &[f32]) -> Result<Bytes, ConfigError> {
    geometry.validate()?;

    if values.len() != geometry.cell_count() {
        return Err(ConfigError::ValueCountMismatch {
            expected: geometry.cell_count(),
            actual: values.len(),
        });
    }

    let mut buf = BytesMut::with_capacity(geometry.frame_byte_length());
    for &value in values {
        match (geometry.cell_byte_width, geometry.endianness) {
            (F64_CELL_WIDTH, Endianness::Little) => buf.put_f64_le(value as f64),
            (F64_CELL_WIDTH, Endianness::Big) => buf.put_f64(value as f64),
            (_, Endianness::Little) => buf.put_f32_le(value),
            (_, Endianness::Big) => buf.put_f32(value),
        }
    }

    Ok(buf.freeze())
}

/// Encode one fragment from raw fixed-point values
///
/// Values wider than the layout's value width are truncated, as the
/// firmware's integer cast does.
pub fn encode_fragment(
    layout: &FragmentLayout,
    header: &FragmentHeader,
    raw_values: &[i32],
) -> Result<Bytes, ConfigError> {
    layout.validate()?;

    if raw_values.len() != layout.value_count {
        return Err(ConfigError::ValueCountMismatch {
            expected: layout.value_count,
            actual: raw_values.len(),
        });
    }

    let little = layout.endianness == Endianness::Little;
    let mut buf = BytesMut::with_capacity(layout.expected_len());

    // Header
    buf.put_u8(header.protocol);
    buf.put_u8(header.half_index);
    match (layout.reserved_width, little) {
        (1, _) => buf.put_u8(header.reserved as u8),
        (_, true) => buf.put_u16_le(header.reserved),
        (_, false) => buf.put_u16(header.reserved),
    }

    // Values
    for &raw in raw_values {
        match (layout.value_width, little) {
            (1, _) => buf.put_i8(raw as i8),
            (2, true) => buf.put_i16_le(raw as i16),
            (2, false) => buf.put_i16(raw as i16),
            (_, true) => buf.put_i32_le(raw),
            (_, false) => buf.put_i32(raw),
        }
    }

    buf.put_bytes(0, layout.trailing_padding);

    Ok(buf.freeze())
}

/// Builder for column-average fragments, mirroring the firmware's sender
pub struct FragmentBuilder {
    layout: FragmentLayout,
    header: FragmentHeader,
    raw_values: Vec<i32>,
}

impl FragmentBuilder {
    /// Start a fragment for slot `half_index`
    pub fn new(layout: FragmentLayout, half_index: u8) -> Self {
        Self {
            layout,
            header: FragmentHeader::new(half_index),
            raw_values: Vec::new(),
        }
    }

    /// Override the protocol byte
    pub fn protocol(mut self, protocol: u8) -> Self {
        self.header.protocol = protocol;
        self
    }

    /// Set the reserved field
    pub fn reserved(mut self, reserved: u16) -> Self {
        self.header.reserved = reserved;
        self
    }

    /// Set raw fixed-point values
    pub fn raw_values(mut self, values: &[i32]) -> Self {
        self.raw_values = values.to_vec();
        self
    }

    /// Set values in degrees, quantized with `scale`
    pub fn degrees(mut self, values: &[f32], scale: f32) -> Self {
        let config = crate::config::FragmentConfig {
            scale,
            ..Default::default()
        };
        self.raw_values = values.iter().map(|&v| config.quantize(v)).collect();
        self
    }

    /// Build and encode the fragment
    pub fn build(self) -> Result<Bytes, ConfigError> {
        encode_fragment(&self.layout, &self.header, &self.raw_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{decode_fragment, decode_frame};

    #[test]
    fn test_encode_frame_layout() {
        let geometry = FrameGeometry::new(1, 2, 4, Endianness::Little).unwrap();
        let encoded = encode_frame(&geometry, &[20.0, 21.0]).unwrap();

        assert_eq!(encoded.len(), 8);
        assert_eq!(&encoded[0..4], &20.0f32.to_le_bytes());
        assert_eq!(&encoded[4..8], &21.0f32.to_le_bytes());
    }

    #[test]
    fn test_encode_frame_f64_big_endian() {
        let geometry = FrameGeometry::new(2, 1, 8, Endianness::Big).unwrap();
        let encoded = encode_frame(&geometry, &[1.5, -2.0]).unwrap();

        assert_eq!(encoded.len(), 16);
        assert_eq!(&encoded[0..8], &1.5f64.to_be_bytes());
        let frame = decode_frame(&geometry, &encoded).unwrap();
        assert_eq!(frame.values(), &[1.5, -2.0]);
    }

    #[test]
    fn test_encode_frame_wrong_count() {
        let geometry = FrameGeometry::new(2, 2, 4, Endianness::Little).unwrap();
        assert!(encode_frame(&geometry, &[1.0; 3]).is_err());
    }

    #[test]
    fn test_fragment_builder_column_strip() {
        let encoded = FragmentBuilder::new(FragmentLayout::column_strip(), 1)
            .raw_values(&[300, 310, 320, 330, 340, 350, 360, 370])
            .build()
            .unwrap();

        assert_eq!(encoded.len(), 19);
        assert_eq!(encoded[0], 1);
        assert_eq!(encoded[1], 1);
        assert_eq!(&encoded[3..5], &300i16.to_le_bytes());
    }

    #[test]
    fn test_fragment_builder_interleaved_padding() {
        let encoded = FragmentBuilder::new(FragmentLayout::interleaved_pair(), 0)
            .reserved(7)
            .degrees(&[20.0, 20.5, 21.0, 21.5, 22.0, 22.5], 0.1)
            .build()
            .unwrap();

        assert_eq!(encoded.len(), 20);
        assert_eq!(&encoded[16..20], &[0, 0, 0, 0]);

        let (header, values) = decode_fragment(&FragmentLayout::interleaved_pair(), &encoded).unwrap();
        assert_eq!(header.reserved, 7);
        assert_eq!(values, vec![200, 205, 210, 215, 220, 225]);
    }
}
