//! Pull-to-refresh: gesture detection, lifecycle, and the injected operation

mod gesture;
mod lifecycle;
mod operation;

pub use gesture::{PullRefreshGesture, RefreshSignal};
pub use lifecycle::{RefreshHandle, RefreshLifecycle, RefreshOutcome, RefreshState};
pub use operation::{DelayRefresh, RefreshOperation};
