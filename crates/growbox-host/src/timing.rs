//! Tick timing for the host loop.
//!
//! In realtime mode wall-clock deltas are accumulated into whole simulation
//! ticks. In fast-forward mode every poll yields exactly one tick.

use std::time::{Duration, Instant};

/// Converts wall-clock time into simulation ticks.
#[derive(Debug)]
pub struct TickClock {
    /// Simulated seconds per tick
    tick_seconds: u64,
    /// Wall-clock length of one tick in realtime mode
    tick_duration: Duration,
    /// Whether ticks follow the wall clock
    realtime: bool,
    /// Time of the last poll
    last_poll: Instant,
    /// Wall-clock time not yet turned into ticks
    accumulator: Duration,
}

impl TickClock {
    /// Creates a clock producing ticks of `tick_seconds` simulated seconds.
    #[must_use]
    pub fn new(tick_seconds: u64, realtime: bool) -> Self {
        let tick_seconds = tick_seconds.max(1);
        Self {
            tick_seconds,
            tick_duration: Duration::from_secs(tick_seconds),
            realtime,
            last_poll: Instant::now(),
            accumulator: Duration::ZERO,
        }
    }

    /// Simulated seconds per tick.
    #[must_use]
    pub fn tick_seconds(&self) -> u64 {
        self.tick_seconds
    }

    /// Whether ticks follow the wall clock.
    #[must_use]
    pub fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Number of ticks due since the last poll.
    pub fn poll(&mut self) -> u32 {
        if !self.realtime {
            return 1;
        }
        let now = Instant::now();
        let dt = now - self.last_poll;
        self.last_poll = now;
        self.accumulate(dt)
    }

    /// Accumulates a wall-clock delta and returns the whole ticks it completes.
    ///
    /// Leftover time stays in the accumulator, so no simulated time is lost
    /// when the host falls behind.
    pub fn accumulate(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut count = 0u32;
        while self.accumulator >= self.tick_duration {
            self.accumulator -= self.tick_duration;
            count = count.saturating_add(1);
        }
        count
    }

    /// Sleeps until the next tick is due (realtime mode only).
    pub fn sleep_until_next(&self) {
        if !self.realtime {
            return;
        }
        let remaining = self.tick_duration.saturating_sub(self.accumulator + self.last_poll.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Drops accumulated time (call after a pause).
    pub fn reset(&mut self) {
        self.last_poll = Instant::now();
        self.accumulator = Duration::ZERO;
    }
}
