pub mod app;
pub mod archive;
pub mod config;
pub mod connection;
pub mod error;
pub mod hub;
pub mod room;
pub mod signaling;

pub use app::*;
pub use archive::*;
pub use config::*;
pub use connection::*;
pub use error::*;
pub use hub::*;
pub use room::*;
pub use signaling::*;
