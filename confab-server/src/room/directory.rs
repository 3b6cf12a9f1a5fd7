use crate::connection::ConnectionRegistry;
use confab_core::{ConnectionId, MemberRecord, RoomId, ServerEvent};
use std::collections::HashMap;
use tracing::debug;

/// Result of [`RoomDirectory::join`].
///
/// Both variants carry the members other than the joiner, in join order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { others: Vec<MemberRecord> },
    AlreadyMember { others: Vec<MemberRecord> },
}

impl JoinOutcome {
    pub fn others(&self) -> &[MemberRecord] {
        match self {
            JoinOutcome::Joined { others } | JoinOutcome::AlreadyMember { others } => others,
        }
    }

    pub fn into_others(self) -> Vec<MemberRecord> {
        match self {
            JoinOutcome::Joined { others } | JoinOutcome::AlreadyMember { others } => others,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, JoinOutcome::Joined { .. })
    }
}

/// Ordered member lists per room.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Vec<MemberRecord>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: &str,
    ) -> JoinOutcome {
        let members = self.rooms.entry(room_id.clone()).or_default();

        let others: Vec<MemberRecord> = members
            .iter()
            .filter(|m| m.connection_id != connection_id)
            .cloned()
            .collect();

        if others.len() != members.len() {
            debug!("{} already in room '{}'", connection_id, room_id);
            return JoinOutcome::AlreadyMember { others };
        }

        members.push(MemberRecord::new(connection_id, display_name));
        JoinOutcome::Joined { others }
    }

    /// Remove a membership. Absent memberships are ignored.
    pub fn leave(&mut self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<MemberRecord> {
        let members = self.rooms.get_mut(room_id)?;
        let position = members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        let record = members.remove(position);

        if members.is_empty() {
            debug!("Room '{}' is empty, dropping its member list", room_id);
            self.rooms.remove(room_id);
        }

        Some(record)
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<MemberRecord> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    /// Send `event` to every member of `room_id` except `excluding`.
    /// Returns how many members it was queued for.
    pub fn broadcast_to_room(
        &self,
        registry: &ConnectionRegistry,
        room_id: &RoomId,
        event: &ServerEvent,
        excluding: Option<&ConnectionId>,
    ) -> usize {
        let Some(members) = self.rooms.get(room_id) else {
            return 0;
        };

        members
            .iter()
            .filter(|m| Some(&m.connection_id) != excluding)
            .filter(|m| registry.deliver(&m.connection_id, event.clone()))
            .count()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
