pub mod carousel;
pub mod config;
pub mod controller;
pub mod error;
pub mod refresh;
pub mod runtime;
pub mod scroll;
pub mod style;

pub use config::{HeaderConfig, ScrollConfig};
pub use controller::{HeaderController, HeaderEvent, HeaderInput, HeaderSnapshot, TapTarget};
pub use error::{Error, Result};
pub use refresh::{DelayRefresh, RefreshOperation, RefreshState};
pub use runtime::{HeaderHandle, HeaderRuntime};
