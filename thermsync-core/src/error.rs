//! Error types for Thermsync operations
//!
//! Implausible byte-stream windows are deliberately absent here: the
//! synchronizer treats them as resynchronization noise, not failures.

/// Per-fragment failures. The live buffer is left untouched when any of
/// these is returned and the fragment is dropped.
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Fragment length does not match the configured layout
    #[cfg_attr(
        feature = "std",
        error("Malformed fragment: expected {expected} bytes, got {actual}")
    )]
    MalformedFragment {
        /// Length required by the layout.
        expected: usize,
        /// Length actually received.
        actual: usize,
    },

    /// Header index outside `[0, count)`
    #[cfg_attr(
        feature = "std",
        error("Invalid fragment index {index}: expected less than {count}")
    )]
    InvalidFragmentIndex {
        /// Index carried by the header.
        index: usize,
        /// Configured fragment count.
        count: usize,
    },
}

/// Construction-time configuration errors. Engines refuse to initialize
/// when any of these is reported.
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Geometry has no cells
    #[cfg_attr(feature = "std", error("Empty geometry: {rows}x{cols}"))]
    EmptyGeometry {
        /// Configured rows.
        rows: usize,
        /// Configured columns.
        cols: usize,
    },

    /// Cell width is not a supported float width
    #[cfg_attr(feature = "std", error("Unsupported cell width: {0} bytes"))]
    UnsupportedCellWidth(usize),

    /// Range bounds are inverted or non-finite
    #[cfg_attr(feature = "std", error("Invalid temperature range [{min}, {max}]"))]
    InvalidRange {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Retention multiple must be at least one frame
    #[cfg_attr(feature = "std", error("Retained buffer must hold at least one frame"))]
    ZeroRetention,

    /// Fragment count outside `[1, 256]`
    #[cfg_attr(feature = "std", error("Invalid fragment count: {0}"))]
    InvalidFragmentCount(usize),

    /// Configured fragment width disagrees with the layout's value count
    #[cfg_attr(
        feature = "std",
        error("Fragment width {width} does not match layout value count {value_count}")
    )]
    FragmentWidthMismatch {
        /// Configured columns per fragment.
        width: usize,
        /// Values packed by the layout.
        value_count: usize,
    },

    /// Fixed-point value width is not 1, 2 or 4 bytes
    #[cfg_attr(feature = "std", error("Unsupported fragment value width: {0} bytes"))]
    UnsupportedValueWidth(usize),

    /// Reserved header field is not 1 or 2 bytes
    #[cfg_attr(feature = "std", error("Unsupported reserved field width: {0} bytes"))]
    UnsupportedReservedWidth(usize),

    /// Scale factor is zero or non-finite
    #[cfg_attr(feature = "std", error("Invalid fixed-point scale: {0}"))]
    InvalidScale(f32),

    /// Number of values does not match the target shape
    #[cfg_attr(
        feature = "std",
        error("Value count mismatch: expected {expected}, got {actual}")
    )]
    ValueCountMismatch {
        /// Values required.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
}
