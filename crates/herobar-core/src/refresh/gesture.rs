use serde::{Deserialize, Serialize};

use super::RefreshState;
use crate::scroll::ramp::{lerp, ramp};

/// Outcome of feeding one overscroll sample to the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshSignal {
    None,
    Trigger,
}

/// Pull-to-refresh detector
///
/// Fires once when overscroll rises past the threshold while no refresh is
/// active. A gesture ends when overscroll returns to zero; only then can the
/// next one fire.
#[derive(Debug, Clone)]
pub struct PullRefreshGesture {
    threshold: f64,
    /// Last sample was past the threshold
    above: bool,
    /// Already triggered during the current gesture
    fired: bool,
}

impl PullRefreshGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            above: false,
            fired: false,
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn observe(&mut self, overscroll: f64, state: RefreshState) -> RefreshSignal {
        let above = overscroll > self.threshold;
        let crossed = above && !self.above;
        self.above = above;

        if overscroll <= 0.0 {
            self.fired = false;
        }

        if crossed && !self.fired && state == RefreshState::Idle {
            self.fired = true;
            RefreshSignal::Trigger
        } else {
            RefreshSignal::None
        }
    }

    /// Forget the current gesture
    pub fn reset(&mut self) {
        self.above = false;
        self.fired = false;
    }

    /// Spinner offset from the top, or `None` when it should not be drawn
    ///
    /// While idle the spinner follows the pull, reaching `rest_offset` at the
    /// threshold. While a refresh is active it sits at `rest_offset`.
    pub fn spinner_offset(&self, overscroll: f64, state: RefreshState, rest_offset: f64) -> Option<f64> {
        match state {
            RefreshState::Idle if overscroll > 0.0 => {
                Some(lerp(0.0, rest_offset, ramp(0.0, self.threshold, overscroll)))
            }
            RefreshState::Idle => None,
            _ => Some(rest_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_once_per_gesture() {
        let mut gesture = PullRefreshGesture::new(80.0);
        assert_eq!(gesture.observe(40.0, RefreshState::Idle), RefreshSignal::None);
        assert_eq!(gesture.observe(81.0, RefreshState::Idle), RefreshSignal::Trigger);
        assert_eq!(gesture.observe(95.0, RefreshState::Idle), RefreshSignal::None);
        assert_eq!(gesture.observe(120.0, RefreshState::Idle), RefreshSignal::None);
    }

    #[test]
    fn test_exact_threshold_does_not_fire() {
        let mut gesture = PullRefreshGesture::new(80.0);
        assert_eq!(gesture.observe(80.0, RefreshState::Idle), RefreshSignal::None);
        assert_eq!(gesture.observe(80.5, RefreshState::Idle), RefreshSignal::Trigger);
    }

    #[test]
    fn test_blocked_while_refresh_active() {
        let mut gesture = PullRefreshGesture::new(80.0);
        for state in [RefreshState::Triggering, RefreshState::Running, RefreshState::Cooling] {
            gesture.observe(0.0, state);
            assert_eq!(gesture.observe(100.0, state), RefreshSignal::None, "{:?}", state);
        }
    }

    #[test]
    fn test_rearms_after_release() {
        let mut gesture = PullRefreshGesture::new(80.0);
        assert_eq!(gesture.observe(90.0, RefreshState::Idle), RefreshSignal::Trigger);
        // Bouncing around the threshold without releasing does not re-fire
        gesture.observe(50.0, RefreshState::Idle);
        assert_eq!(gesture.observe(90.0, RefreshState::Idle), RefreshSignal::None);

        gesture.observe(0.0, RefreshState::Idle);
        assert_eq!(gesture.observe(90.0, RefreshState::Idle), RefreshSignal::Trigger);
    }

    #[test]
    fn test_spinner_offset() {
        let gesture = PullRefreshGesture::new(80.0);
        assert_eq!(gesture.spinner_offset(0.0, RefreshState::Idle, 70.0), None);
        assert_eq!(gesture.spinner_offset(40.0, RefreshState::Idle, 70.0), Some(35.0));
        assert_eq!(gesture.spinner_offset(200.0, RefreshState::Idle, 70.0), Some(70.0));
        assert_eq!(gesture.spinner_offset(0.0, RefreshState::Running, 70.0), Some(70.0));
        assert_eq!(gesture.spinner_offset(10.0, RefreshState::Cooling, 70.0), Some(70.0));
    }
}
