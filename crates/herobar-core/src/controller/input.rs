//! Messages into and out of the header controller

use serde::{Deserialize, Serialize};

use crate::refresh::RefreshHandle;
use crate::scroll::Viewport;

/// Host input, serialized onto the controller's single update stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HeaderInput {
    /// Scroll position changed
    Scroll {
        offset: f64,
        /// Viewport the offset was measured in, when it is known
        #[serde(default)]
        viewport: Option<Viewport>,
    },
    /// User swiped the carousel to a page
    Swipe { page: usize },
    /// User tapped somewhere in or around the header
    Tap { target: TapTarget },
    /// Explicit refresh request (keyboard shortcut, menu)
    Refresh,
}

/// Tap destinations; ids are opaque strings from the header config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TapTarget {
    /// Header icon button or avatar
    Icon(String),
    /// Inside an open popover
    Popover(String),
    /// Anywhere else
    Outside,
}

/// Why the carousel page changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCause {
    AutoAdvance,
    Swipe,
}

/// Notifications for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeaderEvent {
    /// Refresh accepted; show the spinner
    RefreshStarted { handle: RefreshHandle },
    /// Platform feedback (haptic tap) for a triggered refresh
    Feedback,
    /// Injected operation failed; the spinner still runs its full cycle
    RefreshFailed { message: String },
    /// Spinner hidden, refresh cycle over
    RefreshFinished,
    PageChanged { page: usize, cause: PageCause },
    CollapseChanged { collapsed: bool },
    PopoverChanged { id: String, visible: bool },
    IconTapped { id: String },
}

/// Work the controller hands back to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the refresh operation and report back with this handle
    Dispatch(RefreshHandle),
    /// Forward to the host
    Emit(HeaderEvent),
}
