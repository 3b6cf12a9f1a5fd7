use confab_core::{ConnectionId, RoomId, ServerEvent};
use std::collections::BTreeSet;
use tokio::sync::mpsc;

/// Server-side view of one live socket.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    display_name: Option<String>,
    rooms: BTreeSet<RoomId>,
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    pub fn new(id: ConnectionId, outbound: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id,
            display_name: None,
            rooms: BTreeSet::new(),
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Name given on the most recent join.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
    }

    pub fn rooms(&self) -> &BTreeSet<RoomId> {
        &self.rooms
    }

    pub(crate) fn enter(&mut self, room_id: RoomId) {
        self.rooms.insert(room_id);
    }

    pub(crate) fn exit(&mut self, room_id: &RoomId) {
        self.rooms.remove(room_id);
    }

    pub(crate) fn into_rooms(self) -> BTreeSet<RoomId> {
        self.rooms
    }

    /// Queue an event for the socket writer. Fails only when the writer is gone.
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.outbound.send(event)
    }
}
