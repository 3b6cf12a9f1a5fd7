pub mod presence;
pub mod relay;
mod signaling_service;
mod ws_handler;

pub use relay::*;
pub use signaling_service::*;
pub use ws_handler::*;
