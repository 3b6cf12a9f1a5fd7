pub mod error;
pub mod logger;
pub mod media;
pub mod orchestrator;
pub mod peer;
pub mod platform;

#[cfg(target_arch = "wasm32")]
pub mod engine;

pub use error::*;
pub use media::*;
pub use orchestrator::*;
pub use peer::*;
pub use platform::*;

#[cfg(test)]
mod mock;
