//! Runtime frame-rate measurement

use cadence_core::{FramesPerSecond, Seconds};

/// Counts frames over a reporting period and produces an average rate.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    period: Seconds,
    period_start: Seconds,
    frames: u64,
    last: Option<FramesPerSecond>,
}

impl FpsCounter {
    pub fn new(period: Seconds) -> Self {
        Self {
            period,
            period_start: 0.0,
            frames: 0,
            last: None,
        }
    }

    /// Start a fresh period at `now`.
    pub fn reset(&mut self, now: Seconds) {
        self.period_start = now;
        self.frames = 0;
    }

    /// Record a finished frame. Returns the average rate when a period closes.
    pub fn frame(&mut self, now: Seconds) -> Option<FramesPerSecond> {
        self.frames += 1;
        let elapsed = now - self.period_start;
        if elapsed < self.period {
            return None;
        }
        let fps = self.frames as f64 / elapsed;
        self.last = Some(fps);
        self.reset(now);
        Some(fps)
    }

    /// The rate reported at the end of the last completed period.
    pub fn last(&self) -> Option<FramesPerSecond> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_once_per_period() {
        let mut counter = FpsCounter::new(1.0);
        counter.reset(0.0);

        let mut reports = Vec::new();
        for frame in 1..=50 {
            if let Some(fps) = counter.frame(frame as f64 * 0.05) {
                reports.push(fps);
            }
        }

        assert_eq!(reports.len(), 2);
        assert!((reports[0] - 20.0).abs() < 1e-9);
        assert_eq!(counter.last(), Some(reports[1]));
    }

    #[test]
    fn test_nothing_before_first_period() {
        let mut counter = FpsCounter::new(2.0);
        counter.reset(5.0);
        assert_eq!(counter.frame(6.0), None);
        assert_eq!(counter.last(), None);
    }
}
