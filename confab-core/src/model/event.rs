use crate::model::connection::ConnectionId;
use crate::model::room::{MemberRecord, RoomId};
use crate::model::signaling::{IceServerConfig, SignalPayload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub sender: String,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingNotice {
    pub room_id: RoomId,
    pub display_name: String,
    pub is_typing: bool,
}

/// Frames a client sends over its socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
        display_name: String,
    },
    LeaveRoom {
        room_id: RoomId,
        #[serde(default)]
        display_name: String,
    },
    Signaling {
        to: ConnectionId,
        data: SignalPayload,
    },
    ChatMessage(ChatMessage),
    Typing(TypingNotice),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom { .. } => "join-room",
            ClientEvent::LeaveRoom { .. } => "leave-room",
            ClientEvent::Signaling { .. } => "signaling",
            ClientEvent::ChatMessage(_) => "chat-message",
            ClientEvent::Typing(_) => "typing",
        }
    }
}

/// Frames the server pushes to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First frame on every socket.
    Welcome {
        connection_id: ConnectionId,
        ice_servers: Vec<IceServerConfig>,
    },
    /// Members already present, sent only to the connection that just joined.
    RoomUsers {
        room_id: RoomId,
        users: Vec<MemberRecord>,
    },
    UserJoined {
        room_id: RoomId,
        member: MemberRecord,
    },
    UserLeft {
        room_id: RoomId,
        member: MemberRecord,
    },
    Signaling {
        from: ConnectionId,
        data: SignalPayload,
    },
    ChatMessage(ChatMessage),
    Typing(TypingNotice),
}
