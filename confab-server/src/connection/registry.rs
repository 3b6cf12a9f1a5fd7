use crate::connection::Connection;
use confab_core::{ConnectionId, ServerEvent};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Live connections keyed by id. Owned by the hub task, so no locking.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection, replacing any previous entry with the same id.
    ///
    /// The replaced entry is returned so the caller can tear down its
    /// memberships.
    pub fn register(&mut self, connection: Connection) -> (ConnectionId, Option<Connection>) {
        let id = connection.id();
        let previous = self.connections.insert(id, connection);
        (id, previous)
    }

    pub fn unregister(&mut self, id: &ConnectionId) -> Option<Connection> {
        self.connections.remove(id)
    }

    pub fn lookup(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    pub fn lookup_mut(&mut self, id: &ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    /// Push an event to one connection. Returns whether it was queued.
    pub fn deliver(&self, id: &ConnectionId, event: ServerEvent) -> bool {
        let Some(connection) = self.connections.get(id) else {
            debug!("Dropping event for unknown connection {}", id);
            return false;
        };

        match connection.send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("Outbound channel closed for connection {}", id);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
