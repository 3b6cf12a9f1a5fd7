mod connection;
mod event;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use event::{ChatMessage, ClientEvent, ServerEvent, TypingNotice};
pub use room::{MemberRecord, RoomId};
pub use signaling::{IceCandidate, IceServerConfig, SdpKind, SessionDescription, SignalPayload};
