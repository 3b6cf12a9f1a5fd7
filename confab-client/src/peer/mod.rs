mod link;
mod state;

pub use link::*;
pub use state::*;
