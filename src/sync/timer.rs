//! Poll timer with an explicit handle
//!
//! At most one interval exists per timer. `start` always discards the previous
//! interval before arming a new one, and `stop` drops it so no further ticks
//! can fire.

use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

#[derive(Debug)]
enum TimerState {
    Stopped,
    /// Started, but the interval is created on the first `tick` so that
    /// starting does not need a running tokio runtime.
    Armed,
    Running(Interval),
}

#[derive(Debug)]
pub struct PollTimer {
    period: Duration,
    state: TimerState,
    starts: u64,
}

impl PollTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: TimerState::Stopped,
            starts: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self) {
        self.stop();
        self.state = TimerState::Armed;
        self.starts += 1;
    }

    /// Cancel the timer. Returns whether it was active.
    pub fn stop(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = TimerState::Stopped;
        was_active
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, TimerState::Stopped)
    }

    /// Number of times the timer has been started
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Wait for the next tick. Never completes while the timer is stopped.
    ///
    /// The first tick fires one period after the timer starts running; missed
    /// ticks are skipped rather than bursted.
    pub async fn tick(&mut self) {
        if let TimerState::Armed = self.state {
            let mut interval = time::interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.state = TimerState::Running(interval);
        }

        match &mut self.state {
            TimerState::Running(interval) => {
                interval.tick().await;
            }
            _ => std::future::pending::<()>().await,
        }
    }
}
