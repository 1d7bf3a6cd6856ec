/// Frame-rate statistic emitted when a reporting window closes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FpsSample {
    /// Frames per second over the closed window.
    pub fps: f64,

    /// Average milliseconds per frame over the closed window.
    pub frame_ms: f64,
}

/// Rolling frame-rate counter.
///
/// Accumulates frame count and elapsed time; once the accumulated time
/// reaches the reporting interval, a sample is emitted and the window resets.
/// Between samples the last published value is stale; callers keep
/// displaying it until the next report.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: f64,
    frames: u32,
    accumulated: f64,
}

impl FpsCounter {
    /// Default reporting interval in seconds.
    pub const DEFAULT_INTERVAL: f64 = 1.0 / 30.0;

    pub fn new(interval: f64) -> Self {
        debug_assert!(interval > 0.0);
        Self {
            interval,
            frames: 0,
            accumulated: 0.0,
        }
    }

    /// Feeds one frame's delta time; returns a sample when the window closes.
    ///
    /// A window that elapses with zero frames counted cannot occur through
    /// this entry point (every call counts a frame), but the guard stays:
    /// a zero-frame window is discarded instead of dividing by zero.
    pub fn add(&mut self, dt: f64) -> Option<FpsSample> {
        self.frames += 1;
        self.accumulated += dt.max(0.0);

        if self.accumulated < self.interval {
            return None;
        }

        if self.frames == 0 {
            self.accumulated = 0.0;
            return None;
        }

        let sample = FpsSample {
            fps: f64::from(self.frames) / self.accumulated,
            frame_ms: 1000.0 * self.accumulated / f64::from(self.frames),
        };

        self.frames = 0;
        self.accumulated = 0.0;

        Some(sample)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_only_when_interval_crossed() {
        // 10 ms frames against a 1/30 s window: ticks 1..=3 stay silent,
        // tick 4 crosses 33.3 ms and reports.
        let mut fps = FpsCounter::new(1.0 / 30.0);
        assert_eq!(fps.add(0.010), None);
        assert_eq!(fps.add(0.010), None);
        assert_eq!(fps.add(0.010), None);

        let sample = fps.add(0.010).unwrap();
        assert!((sample.fps - 4.0 / 0.040).abs() < 1e-9);
        assert!((sample.frame_ms - 10.0).abs() < 1e-9);
    }

    #[test]
    fn window_resets_after_report() {
        let mut fps = FpsCounter::new(0.030);
        assert!(fps.add(0.040).is_some());
        // New window starts empty.
        assert_eq!(fps.add(0.010), None);
        assert_eq!(fps.add(0.010), None);
        assert!(fps.add(0.010).is_some());
    }

    #[test]
    fn rate_equals_frames_over_accumulated() {
        let mut fps = FpsCounter::new(1.0);
        for _ in 0..59 {
            assert_eq!(fps.add(1.0 / 60.0), None);
        }
        let sample = fps.add(1.0 / 60.0).unwrap();
        let accumulated = 60.0 * (1.0 / 60.0);
        assert!((sample.fps - 60.0 / accumulated).abs() < 1e-6);
    }

    #[test]
    fn negative_dt_is_ignored() {
        // Timestamps should be monotonic, but a clock hiccup must not
        // drive the accumulator backwards.
        let mut fps = FpsCounter::new(0.030);
        assert_eq!(fps.add(-5.0), None);
        assert_eq!(fps.add(0.010), None);
        assert!(fps.add(0.025).is_some());
    }
}
