//! Scroll offset → collapse flag, hero fade and overscroll distance
//!
//! Called for every scroll position update, so everything here is O(1) and
//! allocation-free.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ramp::ramp;
use crate::config::ScrollConfig;

/// Offsets beyond this magnitude are treated as this magnitude
pub const MAX_OFFSET: f64 = 1_000_000.0;

/// Size of the host viewport that produced a scroll update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Top safe-area inset (status bar, notch)
    #[serde(default)]
    pub safe_area_top: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, safe_area_top: f64) -> Self {
        Self {
            width,
            height,
            safe_area_top,
        }
    }

    /// Layout class for a given wide breakpoint
    pub fn layout(&self, wide_breakpoint: f64) -> LayoutClass {
        if self.width >= wide_breakpoint {
            LayoutClass::Wide
        } else {
            LayoutClass::Compact
        }
    }
}

/// Form factor bucket; wide layouts show an always-visible side panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutClass {
    #[default]
    Compact,
    Wide,
}

/// Values derived from one scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollObservation {
    pub collapsed: bool,
    /// Hero opacity in [0, 1]
    pub fade_progress: f64,
    /// Pull distance past the rest position, never negative
    pub overscroll: f64,
}

/// Threshold set for one form factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSignal {
    rest_offset: f64,
    start_fade: f64,
    end_fade: f64,
    collapse_threshold: f64,
    hysteresis: f64,
}

impl ScrollSignal {
    pub fn new(config: &ScrollConfig, safe_area_top: f64) -> Self {
        Self {
            rest_offset: config.rest_offset,
            start_fade: config.start_fade,
            end_fade: config.end_fade,
            collapse_threshold: config.collapse_threshold_for(safe_area_top),
            hysteresis: config.collapse_hysteresis.max(0.0),
        }
    }

    #[inline]
    pub fn collapse_threshold(&self) -> f64 {
        self.collapse_threshold
    }

    /// Derive all values from `offset` alone
    #[inline]
    pub fn observe(&self, offset: f64) -> ScrollObservation {
        ScrollObservation {
            collapsed: offset < self.collapse_threshold,
            fade_progress: ramp(self.end_fade, self.start_fade, offset),
            overscroll: (offset - self.rest_offset).max(0.0),
        }
    }

    /// Like `observe`, but an already collapsed header stays collapsed until
    /// the offset clears the threshold by the hysteresis band
    #[inline]
    pub fn observe_from(&self, offset: f64, was_collapsed: bool) -> ScrollObservation {
        let mut observation = self.observe(offset);
        if was_collapsed && self.hysteresis > 0.0 {
            observation.collapsed = offset < self.collapse_threshold + self.hysteresis;
        }
        observation
    }
}

/// Replace a non-finite or runaway offset with the nearest usable value
///
/// NaN falls back to `last_valid`; infinities and huge jumps are clamped to
/// `MAX_OFFSET` in magnitude.
pub fn sanitize_offset(raw: f64, last_valid: f64) -> f64 {
    if raw.is_nan() {
        warn!(last_valid, "Ignoring NaN scroll offset");
        return last_valid;
    }
    if raw.abs() > MAX_OFFSET {
        warn!(raw, "Clamping out-of-range scroll offset");
    }
    raw.clamp(-MAX_OFFSET, MAX_OFFSET)
}
