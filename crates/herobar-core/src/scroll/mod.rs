//! Scroll input normalization
//!
//! - `ramp` - pure interpolation helpers
//! - `signal` - offset → collapse / fade / overscroll

pub mod ramp;
mod signal;

pub use signal::{
    sanitize_offset, LayoutClass, ScrollObservation, ScrollSignal, Viewport, MAX_OFFSET,
};
