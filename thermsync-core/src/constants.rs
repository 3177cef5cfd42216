//! Sensor defaults and wire layout sizes
//!
//! The defaults describe the MLX90641 link: a 16x12 pixel array streamed as
//! little-endian `f32` over serial, and per-column averages sent as two
//! notification fragments in tenths of a degree.

/// Default number of pixel rows
pub const DEFAULT_ROWS: usize = 12;

/// Default number of pixel columns
pub const DEFAULT_COLS: usize = 16;

/// Byte width of an IEEE-754 single precision cell
pub const F32_CELL_WIDTH: usize = 4;

/// Byte width of an IEEE-754 double precision cell
pub const F64_CELL_WIDTH: usize = 8;

/// Lowest plausible reading in degrees Celsius
pub const DEFAULT_MIN_TEMP: f32 = -40.0;

/// Highest plausible reading in degrees Celsius
pub const DEFAULT_MAX_TEMP: f32 = 150.0;

/// Number of frame lengths the synchronizer may retain between calls
pub const DEFAULT_MAX_RETAINED_FRAMES: usize = 10;

/// Number of fragments that make up one strip
pub const DEFAULT_FRAGMENT_COUNT: usize = 2;

/// Columns carried by one column-strip fragment
pub const DEFAULT_FRAGMENT_WIDTH: usize = 8;

/// Fixed-point scale: raw values are tenths of a degree
pub const DEFAULT_FIXED_POINT_SCALE: f32 = 0.1;

/// Value held by live buffer slots never refreshed since construction
pub const FRAGMENT_SENTINEL: f32 = 0.0;

/// Protocol byte written by current firmware
pub const PROTOCOL_VERSION: u8 = 1;

/// Protocol byte plus index byte, common to every fragment header
pub const FRAGMENT_HEADER_PREFIX: usize = 2;

/// Total length of a column-strip fragment
/// 1 (protocol) + 1 (index) + 1 (reserved) + 8 * 2 (i16 values) = 19 bytes
pub const COLUMN_STRIP_LEN: usize = 19;

/// Total length of an interleaved-pair fragment
/// 1 (protocol) + 1 (index) + 2 (reserved) + 6 * 2 (i16 values) + 4 (padding) = 20 bytes
pub const INTERLEAVED_PAIR_LEN: usize = 20;

/// Values carried by one interleaved-pair fragment
pub const INTERLEAVED_PAIR_VALUES: usize = 6;

/// Indices are carried in a single byte
pub const MAX_FRAGMENT_COUNT: usize = 256;
