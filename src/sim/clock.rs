use std::time::{Duration, Instant};

/// Measures the wall-clock time between frames.
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call (or since construction).
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.as_secs_f64()
    }
}

/// Rolling frame-time statistics, reported every `period`.
pub struct FrameStats {
    period: Duration,
    acc_time: Duration,
    acc_frames: usize,
    last_report: Instant,
}

impl FrameStats {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            acc_time: Duration::ZERO,
            acc_frames: 0,
            last_report: Instant::now(),
        }
    }

    /// Record one frame; returns `(avg_ms, fps)` once per period.
    pub fn record(&mut self, frame_time: Duration) -> Option<(f64, f64)> {
        self.acc_time += frame_time;
        self.acc_frames += 1;
        if self.last_report.elapsed() < self.period {
            return None;
        }
        let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
        let fps = self.acc_frames as f64 / self.last_report.elapsed().as_secs_f64();
        self.acc_time = Duration::ZERO;
        self.acc_frames = 0;
        self.last_report = Instant::now();
        Some((avg_ms, fps))
    }
}
