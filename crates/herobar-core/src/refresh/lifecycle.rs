use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Refresh progress as seen by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    #[default]
    Idle,
    /// Accepted, operation not yet dispatched
    Triggering,
    /// Operation in flight
    Running,
    /// Operation finished, spinner held for the minimum visible time
    Cooling,
}

impl RefreshState {
    /// Spinner is visible in this state
    pub fn is_active(&self) -> bool {
        !matches!(self, RefreshState::Idle)
    }
}

/// Identifies one refresh cycle; completions carrying an old handle are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefreshHandle(Uuid);

impl RefreshHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RefreshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the injected operation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    Succeeded,
    Failed(String),
}

/// Refresh state machine: Idle → Triggering → Running → Cooling → Idle
#[derive(Debug, Clone)]
pub struct RefreshLifecycle {
    state: RefreshState,
    in_flight: Option<RefreshHandle>,
    cooling_until: Option<Instant>,
    minimum_visible: Duration,
}

impl RefreshLifecycle {
    pub fn new(minimum_visible: Duration) -> Self {
        Self {
            state: RefreshState::Idle,
            in_flight: None,
            cooling_until: None,
            minimum_visible,
        }
    }

    #[inline]
    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn in_flight(&self) -> Option<RefreshHandle> {
        self.in_flight
    }

    /// Accept a new refresh. Returns `None` unless idle.
    pub fn trigger(&mut self) -> Option<RefreshHandle> {
        if self.state != RefreshState::Idle {
            debug!(state = ?self.state, "Ignoring refresh trigger");
            return None;
        }
        let handle = RefreshHandle::new();
        self.state = RefreshState::Triggering;
        self.in_flight = Some(handle);
        Some(handle)
    }

    /// Mark the operation for `handle` as started
    pub fn dispatched(&mut self, handle: RefreshHandle) -> bool {
        if self.state == RefreshState::Triggering && self.in_flight == Some(handle) {
            self.state = RefreshState::Running;
            info!(%handle, "Refresh started");
            true
        } else {
            false
        }
    }

    /// Operation for `handle` finished; start cooling from `now`
    ///
    /// Stale or unknown handles are ignored and leave the state unchanged.
    pub fn complete(&mut self, handle: RefreshHandle, now: Instant) -> bool {
        let live = matches!(self.state, RefreshState::Triggering | RefreshState::Running);
        if !live || self.in_flight != Some(handle) {
            debug!(%handle, state = ?self.state, "Ignoring stale refresh completion");
            return false;
        }
        self.state = RefreshState::Cooling;
        self.in_flight = None;
        self.cooling_until = Some(now + self.minimum_visible);
        debug!(%handle, hold_ms = self.minimum_visible.as_millis() as u64, "Refresh cooling");
        true
    }

    /// Return to idle once cooling has elapsed. True on that transition.
    pub fn poll(&mut self, now: Instant) -> bool {
        match (self.state, self.cooling_until) {
            (RefreshState::Cooling, Some(until)) if now >= until => {
                self.state = RefreshState::Idle;
                self.cooling_until = None;
                info!("Refresh finished");
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            RefreshState::Cooling => self.cooling_until,
            _ => None,
        }
    }

    /// Drop any in-flight handle and return to idle
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            debug!(%handle, "Refresh cancelled");
        }
        self.state = RefreshState::Idle;
        self.cooling_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_secs(2);

    #[test]
    fn test_full_cycle() {
        let t0 = Instant::now();
        let mut lifecycle = RefreshLifecycle::new(HOLD);

        let handle = lifecycle.trigger().unwrap();
        assert_eq!(lifecycle.state(), RefreshState::Triggering);
        assert!(lifecycle.dispatched(handle));
        assert_eq!(lifecycle.state(), RefreshState::Running);

        assert!(lifecycle.complete(handle, t0));
        assert_eq!(lifecycle.state(), RefreshState::Cooling);
        assert_eq!(lifecycle.next_deadline(), Some(t0 + HOLD));

        assert!(!lifecycle.poll(t0 + Duration::from_millis(1999)));
        assert_eq!(lifecycle.state(), RefreshState::Cooling);
        assert!(lifecycle.poll(t0 + HOLD));
        assert_eq!(lifecycle.state(), RefreshState::Idle);
    }

    #[test]
    fn test_reentrant_trigger_ignored() {
        let t0 = Instant::now();
        let mut lifecycle = RefreshLifecycle::new(HOLD);
        let handle = lifecycle.trigger().unwrap();
        lifecycle.dispatched(handle);

        assert!(lifecycle.trigger().is_none());
        assert_eq!(lifecycle.in_flight(), Some(handle));

        lifecycle.complete(handle, t0);
        assert!(lifecycle.trigger().is_none());
    }

    #[test]
    fn test_stale_completion_ignored() {
        let t0 = Instant::now();
        let mut lifecycle = RefreshLifecycle::new(HOLD);
        let first = lifecycle.trigger().unwrap();
        lifecycle.dispatched(first);
        lifecycle.cancel();

        let second = lifecycle.trigger().unwrap();
        lifecycle.dispatched(second);
        assert!(!lifecycle.complete(first, t0));
        assert_eq!(lifecycle.state(), RefreshState::Running);

        assert!(lifecycle.complete(second, t0));
        assert!(!lifecycle.complete(second, t0));
    }

    #[test]
    fn test_cancel_clears_cooling() {
        let t0 = Instant::now();
        let mut lifecycle = RefreshLifecycle::new(HOLD);
        let handle = lifecycle.trigger().unwrap();
        lifecycle.dispatched(handle);
        lifecycle.complete(handle, t0);
        lifecycle.cancel();

        assert_eq!(lifecycle.state(), RefreshState::Idle);
        assert_eq!(lifecycle.next_deadline(), None);
    }
}
