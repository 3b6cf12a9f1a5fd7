use confab_core::{ClientEvent, ConnectionId, MemberRecord, RoomId, ServerEvent};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

/// Commands the socket layer sends to the hub.
#[derive(Debug)]
pub enum HubCommand {
    /// A socket finished its handshake.
    Connect {
        connection_id: ConnectionId,
        outbound: mpsc::UnboundedSender<ServerEvent>,
    },

    /// A parsed frame from a connected socket.
    Event {
        connection_id: ConnectionId,
        event: ClientEvent,
    },

    /// The socket closed, either side.
    Disconnect { connection_id: ConnectionId },

    Members {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<MemberRecord>>,
    },

    Stats { reply: oneshot::Sender<HubStats> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
}
