use serde::{Deserialize, Serialize};

use crate::refresh::RefreshState;
use crate::scroll::LayoutClass;
use crate::style::HeaderStyle;

/// Everything the renderer needs, recomputed after each accepted input
///
/// Rendering the same snapshot twice gives the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderSnapshot {
    pub collapsed: bool,
    /// Hero opacity in [0, 1]
    pub fade_progress: f64,
    /// Extra hero height from an active pull; the hero stays pinned to the top
    pub hero_stretch: f64,
    pub carousel_page: usize,
    pub refresh_state: RefreshState,
    /// Spinner offset from the top, `None` when hidden
    pub spinner_offset: Option<f64>,
    /// Index into the configured popovers of the open one
    pub open_popover: Option<usize>,
    pub layout: LayoutClass,
    /// Bar fill and tints for the current collapse state
    pub style: HeaderStyle,
}

impl HeaderSnapshot {
    /// Header is in the Refreshing half of its state space
    pub fn is_refreshing(&self) -> bool {
        self.refresh_state.is_active()
    }

    pub fn popover_visible(&self, index: usize) -> bool {
        self.open_popover == Some(index)
    }
}
