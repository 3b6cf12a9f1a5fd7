//! Room-scoped notifications: join, leave, typing and chat fan-out.

use crate::connection::ConnectionRegistry;
use crate::room::RoomDirectory;
use confab_core::{ChatMessage, ConnectionId, MemberRecord, RoomId, ServerEvent, TypingNotice};

/// Snapshot to the joiner, incremental `user-joined` to everybody else.
///
/// A repeat join only refreshes the joiner's snapshot.
pub fn announce_join(
    registry: &ConnectionRegistry,
    directory: &RoomDirectory,
    room_id: &RoomId,
    joiner: MemberRecord,
    others: Vec<MemberRecord>,
    is_new: bool,
) {
    registry.deliver(
        &joiner.connection_id,
        ServerEvent::RoomUsers {
            room_id: room_id.clone(),
            users: others,
        },
    );

    if !is_new {
        return;
    }

    let excluding = joiner.connection_id;
    let event = ServerEvent::UserJoined {
        room_id: room_id.clone(),
        member: joiner,
    };
    directory.broadcast_to_room(registry, room_id, &event, Some(&excluding));
}

/// Tell the remaining members that `member` is gone. Call after removal.
pub fn announce_leave(
    registry: &ConnectionRegistry,
    directory: &RoomDirectory,
    room_id: &RoomId,
    member: MemberRecord,
) -> usize {
    let excluding = member.connection_id;
    let event = ServerEvent::UserLeft {
        room_id: room_id.clone(),
        member,
    };
    directory.broadcast_to_room(registry, room_id, &event, Some(&excluding))
}

pub fn announce_typing(
    registry: &ConnectionRegistry,
    directory: &RoomDirectory,
    sender: &ConnectionId,
    notice: TypingNotice,
) -> usize {
    let room_id = notice.room_id.clone();
    directory.broadcast_to_room(registry, &room_id, &ServerEvent::Typing(notice), Some(sender))
}

/// Chat goes to every member, the author included.
pub fn broadcast_chat(
    registry: &ConnectionRegistry,
    directory: &RoomDirectory,
    message: ChatMessage,
) -> usize {
    let room_id = message.room_id.clone();
    directory.broadcast_to_room(registry, &room_id, &ServerEvent::ChatMessage(message), None)
}
