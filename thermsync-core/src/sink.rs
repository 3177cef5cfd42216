//! Frame consumer interface
//!
//! Both engines hand frames to a `FrameSink` synchronously from inside
//! `ingest`/`on_fragment`. The engines provide no retry or backpressure:
//! a sink that blocks stalls frame production.

use crate::types::Frame;
use alloc::vec::Vec;

/// Consumer of completed or updated frames
pub trait FrameSink {
    /// Take ownership of one frame
    fn present(&mut self, frame: Frame);
}

impl FrameSink for Vec<Frame> {
    fn present(&mut self, frame: Frame) {
        self.push(frame);
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, frame: Frame) {
        (**self).present(frame);
    }
}

#[cfg(feature = "std")]
impl FrameSink for std::sync::mpsc::Sender<Frame> {
    /// Forward to a consumer thread. A disconnected receiver means the
    /// consumer has torn down, so the frame is dropped.
    fn present(&mut self, frame: Frame) {
        let _ = self.send(frame);
    }
}

/// Sink backed by a closure
pub struct FnSink<F>(F);

impl<F: FnMut(Frame)> FrameSink for FnSink<F> {
    fn present(&mut self, frame: Frame) {
        (self.0)(frame);
    }
}

/// Wrap a closure as a sink
///
/// ```
/// use thermsync_core::sink::{from_fn, FrameSink};
/// use thermsync_core::Frame;
///
/// let mut count = 0;
/// let mut sink = from_fn(|_frame: Frame| count += 1);
/// sink.present(Frame::filled(1, 1, 20.0));
/// drop(sink);
/// assert_eq!(count, 1);
/// ```
pub fn from_fn<F: FnMut(Frame)>(f: F) -> FnSink<F> {
    FnSink(f)
}

/// Sink that keeps only the most recent frame
#[derive(Debug, Default, Clone)]
pub struct LatestFrame {
    frame: Option<Frame>,
    presented: u64,
}

impl LatestFrame {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame, if any
    pub fn get(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Take the most recent frame, leaving the sink empty
    pub fn take(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    /// Total frames presented since construction
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl FrameSink for LatestFrame {
    fn present(&mut self, frame: Frame) {
        self.frame = Some(frame);
        self.presented += 1;
    }
}
