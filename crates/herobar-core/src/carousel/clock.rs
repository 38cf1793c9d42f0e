//! Restartable auto-advance timer for the hero carousel
//!
//! The clock holds deadlines only. It never sleeps or spawns; whoever owns it
//! reads `next_deadline()`, waits, and calls `poll()` with the current time.
//! Dropping the clock therefore cannot leave a live timer behind.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Smallest interval the clock will run at
const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped,
    /// Ticking; `next` is the next tick deadline
    Running { next: Instant },
    /// Stopped, with a restart already scheduled at `at`
    Resuming { at: Instant },
}

/// Periodic tick source with explicit start/stop/restart
#[derive(Debug, Clone)]
pub struct CarouselClock {
    interval: Duration,
    state: ClockState,
}

impl CarouselClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            state: ClockState::Stopped,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    /// A delayed restart is pending
    #[inline]
    pub fn is_resuming(&self) -> bool {
        matches!(self.state, ClockState::Resuming { .. })
    }

    /// Start ticking one interval from `now`
    ///
    /// No-op while running (phase is kept) or while a delayed restart is
    /// pending (the restart will start the clock).
    pub fn start(&mut self, now: Instant) {
        if let ClockState::Stopped = self.state {
            self.state = ClockState::Running {
                next: now + self.interval,
            };
            debug!(interval_ms = self.interval.as_millis() as u64, "Carousel clock started");
        }
    }

    /// Stop ticking and drop any pending restart. Idempotent.
    pub fn stop(&mut self) {
        if self.state != ClockState::Stopped {
            self.state = ClockState::Stopped;
            debug!("Carousel clock stopped");
        }
    }

    /// Stop then start, resetting phase to a full interval from `now`
    pub fn restart(&mut self, now: Instant) {
        self.state = ClockState::Running {
            next: now + self.interval,
        };
        debug!("Carousel clock restarted");
    }

    /// Stop now and restart once `delay` has passed
    pub fn restart_after(&mut self, delay: Duration, now: Instant) {
        self.state = ClockState::Resuming { at: now + delay };
        debug!(delay_ms = delay.as_millis() as u64, "Carousel clock paused for resume");
    }

    /// Earliest instant at which `poll` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ClockState::Stopped => None,
            ClockState::Running { next } => Some(next),
            ClockState::Resuming { at } => Some(at),
        }
    }

    /// Advance the clock to `now`, returning true if a tick elapsed
    ///
    /// At most one tick is reported per call. Missed intervals are skipped
    /// and the next deadline stays aligned to the original phase.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let ClockState::Resuming { at } = self.state {
            if now < at {
                return false;
            }
            self.restart(at);
        }

        match self.state {
            ClockState::Running { next } if now >= next => {
                let missed = (now - next).as_nanos() / self.interval.as_nanos();
                let skip = u32::try_from(missed + 1).unwrap_or(u32::MAX);
                let following = self
                    .interval
                    .checked_mul(skip)
                    .and_then(|step| next.checked_add(step))
                    .unwrap_or(now + self.interval);
                self.state = ClockState::Running { next: following };
                true
            }
            _ => false,
        }
    }
}
