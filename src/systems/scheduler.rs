//! Fixed-rate update and display-rate draw scheduling.
//!
//! The scheduler owns the two counters and the warm-up state. It does not
//! read a clock itself: the [`Engine`](crate::engine::Engine) passes the
//! current time in, so tests drive it with exact instants.
//!
//! While [`SchedulerState::WarmingUp`], updates only count down and frames
//! show the splash screen. Nothing is published until the state becomes
//! [`SchedulerState::Running`].

use std::time::Duration;

use log::{info, trace, warn};

use crate::events::Event;
use crate::events::context::Context;
use crate::resources::gameconfig::{DEFAULT_MAX_CATCH_UP, DEFAULT_SPLASH_TICKS, DEFAULT_TICKS_PER_SECOND};
use crate::systems::collision::collision_pass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    WarmingUp { remaining: u32 },
    Running,
}

/// One update invocation that should publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStep {
    pub delta: Duration,
    pub count: u64,
}

/// What the current display frame should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Splash { count: u64 },
    Draw { count: u64 },
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    state: SchedulerState,
    tick_count: u64,
    draw_count: u64,
    last_update: Option<Duration>,
    delta: Duration,
    last_pace: Option<Duration>,
    accumulator: Duration,
    max_catch_up: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_SECOND, DEFAULT_SPLASH_TICKS)
    }
}

impl Scheduler {
    pub fn new(ticks_per_second: u32, splash_ticks: u32) -> Self {
        let state = if splash_ticks == 0 {
            SchedulerState::Running
        } else {
            SchedulerState::WarmingUp {
                remaining: splash_ticks,
            }
        };
        Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(ticks_per_second.max(1))),
            state,
            tick_count: 0,
            draw_count: 0,
            last_update: None,
            delta: Duration::ZERO,
            last_pace: None,
            accumulator: Duration::ZERO,
            max_catch_up: DEFAULT_MAX_CATCH_UP,
        }
    }

    pub fn with_max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up.max(1);
        self
    }

    /// Count one update invocation at `now`. Returns the step to publish, or
    /// `None` while warming up.
    pub fn begin_update(&mut self, now: Duration) -> Option<UpdateStep> {
        self.tick_count += 1;
        self.delta = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_update = Some(now);

        match self.state {
            SchedulerState::WarmingUp { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    info!("Warm-up finished after {} ticks", self.tick_count);
                    self.state = SchedulerState::Running;
                } else {
                    self.state = SchedulerState::WarmingUp { remaining };
                }
                None
            }
            SchedulerState::Running => Some(UpdateStep {
                delta: self.delta,
                count: self.tick_count,
            }),
        }
    }

    /// Count one display frame.
    pub fn begin_frame(&mut self) -> Frame {
        self.draw_count += 1;
        match self.state {
            SchedulerState::WarmingUp { .. } => Frame::Splash {
                count: self.draw_count,
            },
            SchedulerState::Running => Frame::Draw {
                count: self.draw_count,
            },
        }
    }

    /// Number of fixed-rate updates owed since the previous call. The first
    /// call only starts the accumulator. Owing more than `max_catch_up`
    /// drops the backlog.
    pub fn due_updates(&mut self, now: Duration) -> u32 {
        let Some(last) = self.last_pace.replace(now) else {
            return 0;
        };
        self.accumulator += now.saturating_sub(last);
        let owed = self.accumulator.as_nanos() / self.interval.as_nanos();
        if owed > u128::from(self.max_catch_up) {
            warn!(
                "Dropping {} update(s), running {} this frame",
                owed - u128::from(self.max_catch_up),
                self.max_catch_up
            );
            self.accumulator = Duration::ZERO;
            return self.max_catch_up;
        }
        let owed = owed as u32;
        self.accumulator -= self.interval * owed;
        owed
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// End the warm-up now.
    pub fn skip_warmup(&mut self) {
        if !self.is_running() {
            info!("Warm-up skipped");
            self.state = SchedulerState::Running;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Wall-clock time between the last two update invocations.
    pub fn delta(&self) -> Duration {
        self.delta
    }
}

/// Publish one update: physics, the collision pass, tick, then animate.
pub fn run_update(ctx: &mut Context<'_>, step: UpdateStep) {
    let UpdateStep { delta, count } = step;
    ctx.publish(&Event::Physics { delta, count });
    let collisions = collision_pass(ctx);
    if collisions > 0 {
        trace!("Tick {}: {} collision deliveries", count, collisions);
    }
    ctx.publish(&Event::Tick { delta, count });
    ctx.publish(&Event::Animate { delta, count });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn warmup_swallows_updates_then_runs() {
        let mut s = Scheduler::new(100, 3);
        assert_eq!(s.begin_frame(), Frame::Splash { count: 1 });
        assert_eq!(s.begin_update(ms(0)), None);
        assert_eq!(s.begin_update(ms(10)), None);
        assert_eq!(s.state(), SchedulerState::WarmingUp { remaining: 1 });
        assert_eq!(s.begin_update(ms(20)), None);
        assert!(s.is_running());
        assert_eq!(
            s.begin_update(ms(30)),
            Some(UpdateStep {
                delta: ms(10),
                count: 4
            })
        );
        assert_eq!(s.begin_frame(), Frame::Draw { count: 2 });
    }

    #[test]
    fn zero_splash_starts_running() {
        let mut s = Scheduler::new(100, 0);
        assert!(s.is_running());
        let first = s.begin_update(ms(5)).unwrap();
        assert_eq!(first.delta, Duration::ZERO);
        assert_eq!(first.count, 1);
    }

    #[test]
    fn skip_warmup_ends_the_splash() {
        let mut s = Scheduler::default();
        assert!(!s.is_running());
        s.skip_warmup();
        assert_eq!(s.begin_frame(), Frame::Draw { count: 1 });
    }

    #[test]
    fn pacing_accumulates_partial_intervals() {
        let mut s = Scheduler::new(100, 0);
        assert_eq!(s.due_updates(ms(0)), 0);
        assert_eq!(s.due_updates(ms(16)), 1);
        assert_eq!(s.due_updates(ms(32)), 2);
        assert_eq!(s.due_updates(ms(35)), 0);
        assert_eq!(s.due_updates(ms(40)), 1);
    }

    #[test]
    fn pacing_caps_and_drops_backlog() {
        let mut s = Scheduler::new(100, 0).with_max_catch_up(4);
        s.due_updates(ms(0));
        assert_eq!(s.due_updates(ms(1000)), 4);
        assert_eq!(s.due_updates(ms(1005)), 0);
        assert_eq!(s.due_updates(ms(1010)), 1);
    }

    #[test]
    fn interval_follows_rate() {
        assert_eq!(Scheduler::new(100, 0).interval(), ms(10));
        assert_eq!(Scheduler::new(0, 0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn default_matches_engine_config() {
        let config = crate::resources::gameconfig::EngineConfig::new();
        let s = Scheduler::default();
        assert_eq!(s.interval(), ms(1000 / config.ticks_per_second as u64));
        assert_eq!(s.state(), SchedulerState::WarmingUp { remaining: config.splash_ticks });
        assert_eq!(s.max_catch_up, config.max_catch_up);
    }
}
