mod handle;
mod service;

pub use handle::HeaderHandle;
pub use service::HeaderRuntime;
