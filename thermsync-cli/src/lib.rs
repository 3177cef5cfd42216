//! Library entry for thermsync-cli used by integration tests and embedding.

pub mod commands;
pub mod config;
pub mod rate;

// Re-export commands for convenience
pub use commands::*;

/// What the simulator writes
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CaptureKind {
    /// Raw serial bytes: back-to-back frames with noise bursts
    Serial,
    /// Hex-encoded notification fragments, one per line
    Fragments,
}

/// Fragment layout selectable on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutArg {
    /// 19-byte fragments, contiguous halves of a 16-column strip
    ColumnStrip,
    /// 20-byte fragments, even/odd columns of a 12-column strip
    InterleavedPair,
}

impl LayoutArg {
    /// The core layout this argument names
    pub fn layout(self) -> thermsync_core::fragment::FragmentLayout {
        use thermsync_core::fragment::FragmentLayout;
        match self {
            LayoutArg::ColumnStrip => FragmentLayout::column_strip(),
            LayoutArg::InterleavedPair => FragmentLayout::interleaved_pair(),
        }
    }
}
