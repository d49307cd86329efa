//! Loop counters visible to handlers, and the once-per-second rate sampler.

use std::time::Duration;

const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// Snapshot of the scheduler counters at the time a context was built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldTime {
    /// Fixed-rate update invocations so far, including warm-up ones.
    pub tick_count: u64,
    /// Display frames rendered so far, including splash frames.
    pub draw_count: u64,
    /// Wall-clock time between the last two update invocations.
    pub delta: Duration,
    /// Updates during the last full second.
    pub tps: u64,
    /// Frames during the last full second.
    pub fps: u64,
}

/// Ticks-per-second and frames-per-second, sampled from counter deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub tps: u64,
    pub fps: u64,
    last_sample: Option<Duration>,
    last_tick_count: u64,
    last_draw_count: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a sample if a second has passed since the previous one.
    /// Returns whether the rates were updated.
    pub fn sample(&mut self, now: Duration, tick_count: u64, draw_count: u64) -> bool {
        let Some(last) = self.last_sample else {
            self.start(now, tick_count, draw_count);
            return false;
        };
        if now.saturating_sub(last) < SAMPLE_PERIOD {
            return false;
        }
        self.tps = tick_count - self.last_tick_count;
        self.fps = draw_count - self.last_draw_count;
        self.start(now, tick_count, draw_count);
        true
    }

    fn start(&mut self, now: Duration, tick_count: u64, draw_count: u64) {
        self.last_sample = Some(now);
        self.last_tick_count = tick_count;
        self.last_draw_count = draw_count;
    }
}
