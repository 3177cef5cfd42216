//! Resynchronizing scanner for the unframed serial stream
//!
//! The serial link carries bare frames back to back, with no marker,
//! length prefix or checksum. Alignment is recovered by decoding a window
//! at each offset and sliding one byte whenever the window is implausible.
//! Once aligned, frames are assumed contiguous and consumed whole.

use crate::config::SensorConfig;
use crate::decoder::decode_plausible;
use crate::error::ConfigError;
use crate::sink::FrameSink;
use crate::types::{Frame, FrameGeometry};
use crate::validator::FrameValidator;
use alloc::vec::Vec;
use bytes::{Buf, BytesMut};

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// A frame together with its position in the overall byte stream
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedFrame {
    /// Offset of the frame's first byte since the synchronizer was created
    pub offset: u64,

    /// The decoded frame
    pub frame: Frame,
}

/// Cumulative synchronizer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total bytes handed to `ingest`
    pub bytes_ingested: u64,

    /// Bytes skipped one at a time while searching for alignment
    pub bytes_skipped: u64,

    /// Bytes dropped by the retention bound
    pub bytes_trimmed: u64,

    /// Frames emitted
    pub frames_emitted: u64,
}

impl SyncStats {
    /// Share of ingested bytes skipped as noise, as a percentage
    pub fn skip_rate(&self) -> f64 {
        if self.bytes_ingested == 0 {
            0.0
        } else {
            (self.bytes_skipped as f64 / self.bytes_ingested as f64) * 100.0
        }
    }
}

/// Stateful scanner over an accumulating byte buffer
///
/// State is the retained byte buffer only; the scan cursor is recomputed
/// from zero on every call. There is no locked/unlocked state machine: a
/// sustained run of empty emissions is the only sign of lost alignment.
#[derive(Debug)]
pub struct ByteStreamSynchronizer {
    geometry: FrameGeometry,
    validator: FrameValidator,
    max_retained: usize,
    buffer: BytesMut,
    stream_position: u64,
    stats: SyncStats,
}

impl ByteStreamSynchronizer {
    /// Create a synchronizer retaining at most `max_retained_frames` frame
    /// lengths between calls
    pub fn new(
        geometry: FrameGeometry,
        validator: FrameValidator,
        max_retained_frames: usize,
    ) -> Result<Self, ConfigError> {
        geometry.validate()?;
        validator.range().validate()?;
        if max_retained_frames == 0 {
            return Err(ConfigError::ZeroRetention);
        }

        let max_retained = max_retained_frames * geometry.frame_byte_length();

        Ok(Self {
            geometry,
            validator,
            max_retained,
            buffer: BytesMut::with_capacity(max_retained + geometry.frame_byte_length()),
            stream_position: 0,
            stats: SyncStats::default(),
        })
    }

    /// Create a synchronizer from a full sensor configuration
    pub fn from_config(config: &SensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(
            config.geometry,
            FrameValidator::new(config.range)?,
            config.max_retained_frames,
        )
    }

    /// Append `data` and return every frame that can now be decoded
    pub fn ingest(&mut self, data: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        self.ingest_into(data, &mut frames);
        frames
    }

    /// Append `data` and hand every decodable frame to `sink`, in stream
    /// order. Returns the number of frames presented.
    pub fn ingest_into<S: FrameSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> usize {
        self.scan(data, |_, frame| sink.present(frame))
    }

    /// Like [`ingest`](Self::ingest), also reporting each frame's stream offset
    pub fn ingest_located(&mut self, data: &[u8]) -> Vec<LocatedFrame> {
        let mut located = Vec::new();
        self.scan(data, |offset, frame| located.push(LocatedFrame { offset, frame }));
        located
    }

    fn scan<F: FnMut(u64, Frame)>(&mut self, data: &[u8], mut emit: F) -> usize {
        self.buffer.extend_from_slice(data);
        self.stats.bytes_ingested += data.len() as u64;

        let frame_len = self.geometry.frame_byte_length();
        let mut offset = 0usize;
        let mut emitted = 0usize;
        let mut skipped = 0usize;

        while self.buffer.len() - offset >= frame_len {
            let window = &self.buffer[offset..offset + frame_len];
            match decode_plausible(&self.geometry, &self.validator, window) {
                Some(frame) => {
                    #[cfg(feature = "logging")]
                    trace!(
                        "Frame at stream offset {}",
                        self.stream_position + offset as u64
                    );

                    emit(self.stream_position + offset as u64, frame);
                    offset += frame_len;
                    emitted += 1;
                }
                None => {
                    offset += 1;
                    skipped += 1;
                }
            }
        }

        // Drop consumed and skipped bytes; the tail may be a straddling frame
        self.buffer.advance(offset);
        self.stream_position += offset as u64;

        if self.buffer.len() > self.max_retained {
            let excess = self.buffer.len() - self.max_retained;

            #[cfg(feature = "logging")]
            warn!(
                "Retained buffer over bound ({} > {} bytes), trimming {} oldest bytes",
                self.buffer.len(),
                self.max_retained,
                excess
            );

            self.buffer.advance(excess);
            self.stream_position += excess as u64;
            self.stats.bytes_trimmed += excess as u64;
        }

        #[cfg(feature = "logging")]
        if skipped > 0 {
            debug!(
                "Skipped {} bytes while resynchronizing, emitted {} frames",
                skipped, emitted
            );
        }

        self.stats.bytes_skipped += skipped as u64;
        self.stats.frames_emitted += emitted as u64;

        emitted
    }

    /// Bytes currently retained for the next call
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// The retained bytes
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Upper bound on retained bytes after any call
    pub fn max_retained_bytes(&self) -> usize {
        self.max_retained
    }

    /// Stream offset of the first retained byte
    pub fn stream_position(&self) -> u64 {
        self.stream_position
    }

    /// Frame geometry
    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Plausibility predicate
    pub fn validator(&self) -> &FrameValidator {
        &self.validator
    }

    /// Cumulative statistics
    pub fn stats(&self) -> SyncStats {
        self.stats
    }
}
