mod hub;
mod hub_command;

pub use hub::*;
pub use hub_command::*;

use crate::archive::ChatArchive;
use crate::signaling::SignalingService;
use confab_core::IceServerConfig;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Start the hub task and return the handle sockets talk to it through.
///
/// The hub stops once every clone of the returned service is dropped.
pub fn spawn_hub(
    ice_servers: Vec<IceServerConfig>,
    command_buffer: usize,
    archive: Arc<dyn ChatArchive>,
) -> (SignalingService, JoinHandle<()>) {
    info!(
        "Starting hub with {} ICE servers, command buffer {}",
        ice_servers.len(),
        command_buffer
    );

    let (tx, rx) = mpsc::channel(command_buffer.max(1));
    let hub = Hub::new(rx, ice_servers, archive);
    let handle = tokio::spawn(hub.run());

    (SignalingService::new(tx), handle)
}
