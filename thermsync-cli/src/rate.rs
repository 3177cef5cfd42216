//! Frames-per-second meter for live monitoring

use std::time::{Duration, Instant};

/// Counts frames and reports a rate once per elapsed window
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    window: Duration,
    started: Instant,
    count: u32,
    last_rate: Option<f64>,
}

impl FrameRateMeter {
    /// Meter reporting once per second
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1), Instant::now())
    }

    /// Meter with a custom window starting at `now`
    pub fn with_window(window: Duration, now: Instant) -> Self {
        Self {
            window,
            started: now,
            count: 0,
            last_rate: None,
        }
    }

    /// Record one frame; returns a fresh rate when the window has elapsed
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    /// Record one frame observed at `now`
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.count += 1;
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed < self.window {
            return None;
        }
        let rate = self.count as f64 / elapsed.as_secs_f64();
        self.count = 0;
        self.started = now;
        self.last_rate = Some(rate);
        Some(rate)
    }

    /// Most recent completed rate
    pub fn last_rate(&self) -> Option<f64> {
        self.last_rate
    }
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_after_window() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::with_window(Duration::from_secs(1), start);

        for i in 1..8 {
            assert!(meter.tick_at(start + Duration::from_millis(i * 100)).is_none());
        }
        let rate = meter.tick_at(start + Duration::from_millis(1000)).unwrap();
        assert!((rate - 8.0).abs() < 1e-9);
        assert_eq!(meter.last_rate(), Some(rate));

        // Window restarts
        assert!(meter.tick_at(start + Duration::from_millis(1100)).is_none());
    }
}
