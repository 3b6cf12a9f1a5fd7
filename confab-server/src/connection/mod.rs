mod connection;
mod registry;

pub use connection::*;
pub use registry::*;
