//! Indexed fragment merge for the notification transport
//!
//! Each fragment refreshes one slot of a live strip buffer. There is no
//! notion of a complete frame: every accepted fragment yields the full
//! current buffer, which may mix slots refreshed at different times.
//! Slots never refreshed hold [`FRAGMENT_SENTINEL`].

use crate::config::{FragmentConfig, SensorConfig};
use crate::constants::FRAGMENT_SENTINEL;
use crate::decoder::decode_fragment;
use crate::error::{ConfigError, FragmentError};
use crate::fragment::FragmentHeader;
use crate::sink::FrameSink;
use crate::types::Frame;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Cumulative reassembler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Fragments applied to the live buffer
    pub applied: u64,

    /// Fragments dropped for a length mismatch
    pub malformed: u64,

    /// Fragments dropped for an out-of-range index
    pub invalid_index: u64,
}

impl ReassemblyStats {
    /// Total fragments dropped
    pub fn rejected(&self) -> u64 {
        self.malformed + self.invalid_index
    }
}

/// Live strip buffer merged from indexed fragments
#[derive(Debug, Clone)]
pub struct FragmentReassembler {
    config: FragmentConfig,
    live: Vec<f32>,
    // Update sequence of the last fragment applied to each slot, 0 = never
    slot_seq: Vec<u64>,
    seq: u64,
    stats: ReassemblyStats,
}

impl FragmentReassembler {
    /// Create a reassembler with every slot at the sentinel
    pub fn new(config: FragmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            live: vec![FRAGMENT_SENTINEL; config.total_columns()],
            slot_seq: vec![0; config.count],
            seq: 0,
            stats: ReassemblyStats::default(),
        })
    }

    /// Create a reassembler from a full sensor configuration
    pub fn from_config(config: &SensorConfig) -> Result<Self, ConfigError> {
        Self::new(config.fragments)
    }

    /// Apply one fragment and return the updated strip as a `1 x total_columns` frame
    ///
    /// On error the live buffer is unchanged and the fragment is dropped.
    pub fn on_fragment(&mut self, raw: &[u8]) -> Result<Frame, FragmentError> {
        self.apply(raw)?;
        Ok(self.snapshot())
    }

    /// Apply one fragment and present the updated strip to `sink`
    pub fn on_fragment_into<S: FrameSink + ?Sized>(
        &mut self,
        raw: &[u8],
        sink: &mut S,
    ) -> Result<(), FragmentError> {
        let frame = self.on_fragment(raw)?;
        sink.present(frame);
        Ok(())
    }

    /// Apply one fragment without building a frame; returns the parsed header
    pub fn apply(&mut self, raw: &[u8]) -> Result<FragmentHeader, FragmentError> {
        let (header, values) = match decode_fragment(&self.config.layout, raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!("Dropping fragment: {}", e);

                self.stats.malformed += 1;
                return Err(e);
            }
        };

        let index = header.index();
        if index >= self.config.count {
            let err = FragmentError::InvalidFragmentIndex {
                index,
                count: self.config.count,
            };

            #[cfg(feature = "logging")]
            warn!("Dropping fragment: {}", err);

            self.stats.invalid_index += 1;
            return Err(err);
        }

        let FragmentConfig {
            count,
            width,
            layout,
            ..
        } = self.config;
        for (j, raw_value) in values.into_iter().enumerate() {
            let column = layout.placement.column(index, j, count, width);
            self.live[column] = self.config.scale_value(raw_value);
        }

        self.seq += 1;
        self.slot_seq[index] = self.seq;
        self.stats.applied += 1;

        #[cfg(feature = "logging")]
        debug!(
            "Applied fragment {} (protocol {}, update {})",
            index, header.protocol, self.seq
        );

        Ok(header)
    }

    /// Current strip as a `1 x total_columns` frame
    pub fn snapshot(&self) -> Frame {
        Frame::from_parts(1, self.live.len(), self.live.clone())
    }

    /// Current strip values
    pub fn live_values(&self) -> &[f32] {
        &self.live
    }

    /// Whether slot `index` has been refreshed since construction
    pub fn is_populated(&self, index: usize) -> bool {
        self.slot_seq.get(index).is_some_and(|&s| s != 0)
    }

    /// Whether every slot has been refreshed at least once
    pub fn is_complete(&self) -> bool {
        self.slot_seq.iter().all(|&s| s != 0)
    }

    /// Update sequence number of the last fragment applied to slot `index`
    pub fn update_seq(&self, index: usize) -> Option<u64> {
        self.slot_seq.get(index).copied().filter(|&s| s != 0)
    }

    /// Number of updates between the oldest and newest slot
    ///
    /// `None` until every slot is populated. A skew larger than
    /// `count - 1` means some slot was refreshed less often than the
    /// others, so the strip mixes readings of different ages.
    pub fn slot_skew(&self) -> Option<u64> {
        if !self.is_complete() {
            return None;
        }
        let newest = self.slot_seq.iter().copied().max()?;
        let oldest = self.slot_seq.iter().copied().min()?;
        Some(newest - oldest)
    }

    /// Fragment configuration
    pub fn config(&self) -> &FragmentConfig {
        &self.config
    }

    /// Cumulative statistics
    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FragmentBuilder;
    use crate::fragment::FragmentLayout;

    fn strip_fragment(index: u8, raw: &[i32]) -> bytes::Bytes {
        FragmentBuilder::new(FragmentLayout::column_strip(), index)
            .raw_values(raw)
            .build()
            .unwrap()
    }

    #[test]
    fn test_first_fragment_leaves_sentinel() {
        let mut reassembler = FragmentReassembler::new(FragmentConfig::default()).unwrap();
        let frame = reassembler
            .on_fragment(&strip_fragment(0, &[200, 210, 220, 230, 240, 250, 260, 270]))
            .unwrap();

        assert_eq!(frame.shape(), (1, 16));
        assert!((frame.values()[0] - 20.0).abs() < 1e-5);
        assert_eq!(&frame.values()[8..], &[FRAGMENT_SENTINEL; 8]);
        assert!(reassembler.is_populated(0));
        assert!(!reassembler.is_complete());
        assert_eq!(reassembler.slot_skew(), None);
    }

    #[test]
    fn test_invalid_index_leaves_buffer() {
        let mut reassembler = FragmentReassembler::new(FragmentConfig::default()).unwrap();
        reassembler
            .on_fragment(&strip_fragment(1, &[300; 8]))
            .unwrap();
        let before = reassembler.live_values().to_vec();

        let err = reassembler.on_fragment(&strip_fragment(2, &[1; 8])).unwrap_err();
        assert_eq!(err, FragmentError::InvalidFragmentIndex { index: 2, count: 2 });
        assert_eq!(reassembler.live_values(), &before[..]);
        assert_eq!(reassembler.stats().invalid_index, 1);
    }

    #[test]
    fn test_malformed_leaves_buffer() {
        let mut reassembler = FragmentReassembler::new(FragmentConfig::default()).unwrap();
        let err = reassembler.on_fragment(&[1, 0, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            FragmentError::MalformedFragment {
                expected: 19,
                actual: 4
            }
        );
        assert!(reassembler.live_values().iter().all(|&v| v == FRAGMENT_SENTINEL));
        assert_eq!(reassembler.stats().malformed, 1);
    }

    #[test]
    fn test_interleaved_pair_fills_even_and_odd() {
        let config = FragmentConfig {
            count: 2,
            width: 6,
            scale: 0.1,
            layout: FragmentLayout::interleaved_pair(),
        };
        let mut reassembler = FragmentReassembler::new(config).unwrap();

        let even = FragmentBuilder::new(config.layout, 0)
            .raw_values(&[0, 20, 40, 60, 80, 100])
            .build()
            .unwrap();
        let odd = FragmentBuilder::new(config.layout, 1)
            .raw_values(&[10, 30, 50, 70, 90, 110])
            .build()
            .unwrap();

        reassembler.on_fragment(&even).unwrap();
        let frame = reassembler.on_fragment(&odd).unwrap();

        for (i, v) in frame.values().iter().enumerate() {
            assert!((v - i as f32).abs() < 1e-5, "column {} = {}", i, v);
        }
    }

    #[test]
    fn test_slot_skew_tracks_uneven_refresh() {
        let mut reassembler = FragmentReassembler::new(FragmentConfig::default()).unwrap();
        reassembler.apply(&strip_fragment(0, &[1; 8])).unwrap();
        reassembler.apply(&strip_fragment(1, &[2; 8])).unwrap();
        assert_eq!(reassembler.slot_skew(), Some(1));

        reassembler.apply(&strip_fragment(0, &[3; 8])).unwrap();
        reassembler.apply(&strip_fragment(0, &[4; 8])).unwrap();
        assert_eq!(reassembler.update_seq(0), Some(4));
        assert_eq!(reassembler.update_seq(1), Some(2));
        assert_eq!(reassembler.slot_skew(), Some(2));
    }

    #[test]
    fn test_sink_notified_per_fragment() {
        let mut reassembler = FragmentReassembler::new(FragmentConfig::default()).unwrap();
        let mut sink: Vec<Frame> = Vec::new();
        reassembler
            .on_fragment_into(&strip_fragment(0, &[1; 8]), &mut sink)
            .unwrap();
        reassembler
            .on_fragment_into(&strip_fragment(0, &[2; 8]), &mut sink)
            .unwrap();
        assert!(reassembler
            .on_fragment_into(&strip_fragment(9, &[2; 8]), &mut sink)
            .is_err());
        assert_eq!(sink.len(), 2);
    }
}
