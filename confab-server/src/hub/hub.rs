use crate::archive::ChatArchive;
use crate::connection::{Connection, ConnectionRegistry};
use crate::hub::{HubCommand, HubStats};
use crate::room::RoomDirectory;
use crate::signaling::{presence, relay};
use confab_core::{ClientEvent, ConnectionId, IceServerConfig, MemberRecord, RoomId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The single owner of connection and membership state.
///
/// Every command is handled to completion before the next one is received,
/// so handlers never observe a half-applied mutation.
pub struct Hub {
    registry: ConnectionRegistry,
    directory: RoomDirectory,
    ice_servers: Vec<IceServerConfig>,
    archive: Arc<dyn ChatArchive>,
    command_rx: mpsc::Receiver<HubCommand>,
}

impl Hub {
    pub fn new(
        command_rx: mpsc::Receiver<HubCommand>,
        ice_servers: Vec<IceServerConfig>,
        archive: Arc<dyn ChatArchive>,
    ) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            directory: RoomDirectory::new(),
            ice_servers,
            archive,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Hub event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!(
            "Command channel closed, hub shutting down with {} live connections",
            self.registry.len()
        );
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    pub fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Connect {
                connection_id,
                outbound,
            } => self.connect(connection_id, outbound),

            HubCommand::Event {
                connection_id,
                event,
            } => self.handle_event(connection_id, event),

            HubCommand::Disconnect { connection_id } => self.disconnect(&connection_id),

            HubCommand::Members { room_id, reply } => {
                let _ = reply.send(self.directory.members(&room_id));
            }

            HubCommand::Stats { reply } => {
                let _ = reply.send(HubStats {
                    connections: self.registry.len(),
                    rooms: self.directory.room_count(),
                });
            }
        }
    }

    fn connect(&mut self, connection_id: ConnectionId, outbound: mpsc::UnboundedSender<ServerEvent>) {
        info!("Connection {} registered", connection_id);

        let (id, previous) = self
            .registry
            .register(Connection::new(connection_id, outbound));

        if let Some(previous) = previous {
            warn!("Connection {} re-registered, evicting the old session", id);
            self.evict(&id, previous);
        }

        self.registry.deliver(
            &id,
            ServerEvent::Welcome {
                connection_id: id,
                ice_servers: self.ice_servers.clone(),
            },
        );
    }

    fn handle_event(&mut self, connection_id: ConnectionId, event: ClientEvent) {
        if !self.registry.contains(&connection_id) {
            warn!(
                "Ignoring '{}' from unregistered connection {}",
                event.name(),
                connection_id
            );
            return;
        }

        match event {
            ClientEvent::JoinRoom {
                room_id,
                display_name,
            } => self.join(connection_id, room_id, display_name),

            ClientEvent::LeaveRoom { room_id, .. } => self.leave(connection_id, &room_id),

            ClientEvent::Signaling { to, data } => {
                relay(&self.registry, connection_id, to, data);
            }

            ClientEvent::ChatMessage(message) => {
                self.archive.record(&message);
                let delivered = presence::broadcast_chat(&self.registry, &self.directory, message);
                debug!("Chat from {} delivered to {} members", connection_id, delivered);
            }

            ClientEvent::Typing(notice) => {
                presence::announce_typing(&self.registry, &self.directory, &connection_id, notice);
            }
        }
    }

    fn join(&mut self, connection_id: ConnectionId, room_id: RoomId, display_name: String) {
        if room_id.as_str().trim().is_empty() {
            warn!("Connection {} tried to join a room with an empty id", connection_id);
            return;
        }

        if let Some(connection) = self.registry.lookup_mut(&connection_id) {
            connection.set_display_name(display_name.as_str());
            connection.enter(room_id.clone());
        }

        let outcome = self.directory.join(&room_id, connection_id, &display_name);
        let is_new = outcome.is_new();

        if is_new {
            info!("{} ({}) joined room '{}'", display_name, connection_id, room_id);
        }

        presence::announce_join(
            &self.registry,
            &self.directory,
            &room_id,
            MemberRecord::new(connection_id, display_name),
            outcome.into_others(),
            is_new,
        );
    }

    fn leave(&mut self, connection_id: ConnectionId, room_id: &RoomId) {
        if let Some(connection) = self.registry.lookup_mut(&connection_id) {
            connection.exit(room_id);
        }

        let Some(member) = self.directory.leave(room_id, &connection_id) else {
            debug!("{} left room '{}' it was not in", connection_id, room_id);
            return;
        };

        info!("{} ({}) left room '{}'", member.display_name, connection_id, room_id);
        presence::announce_leave(&self.registry, &self.directory, room_id, member);
    }

    fn disconnect(&mut self, connection_id: &ConnectionId) {
        let Some(connection) = self.registry.unregister(connection_id) else {
            debug!("Disconnect for unknown connection {}", connection_id);
            return;
        };

        info!("Connection {} disconnected", connection_id);
        self.evict(connection_id, connection);
    }

    /// Strip a dead session from every room it was in.
    fn evict(&mut self, connection_id: &ConnectionId, connection: Connection) {
        for room_id in connection.into_rooms() {
            if let Some(member) = self.directory.leave(&room_id, connection_id) {
                presence::announce_leave(&self.registry, &self.directory, &room_id, member);
            }
        }
    }
}
