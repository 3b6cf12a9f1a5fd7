//! Seams between the orchestrator and the environment it runs in.
//!
//! The browser binding implements these over `web-sys`; tests use in-memory
//! mocks.

use crate::error::ClientError;
use crate::media::MediaKind;
use async_trait::async_trait;
use confab_core::{ClientEvent, ConnectionId, IceCandidate, IceServerConfig, SessionDescription};

/// Callbacks a transport reports back. They are queued and handled in order
/// with everything else the orchestrator does.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    LocalCandidate(IceCandidate),
    Connected,
    Failed,
}

/// One media transport bound to one remote participant.
#[async_trait(?Send)]
pub trait MediaTransport {
    type Track;

    /// Replace the attached local tracks with exactly `tracks`.
    fn set_local_tracks(&self, tracks: &[Self::Track]);

    /// Create an offer and install it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription, ClientError>;

    /// Create an answer and install it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription, ClientError>;

    async fn apply_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), ClientError>;

    async fn add_candidate(&self, candidate: &IceCandidate) -> Result<(), ClientError>;

    fn close(&self);
}

#[async_trait(?Send)]
pub trait MediaPlatform {
    type Track: Clone;
    type Transport: MediaTransport<Track = Self::Track>;

    /// Transport events for `remote` must be routed back tagged with that id.
    fn open_transport(
        &self,
        remote: ConnectionId,
        ice_servers: &[IceServerConfig],
    ) -> Result<Self::Transport, ClientError>;

    async fn acquire(&self, kind: MediaKind) -> Result<Self::Track, ClientError>;

    fn stop_track(&self, track: &Self::Track);

    /// Local preview changed.
    fn render_local(&self, tracks: &[Self::Track]);

    /// Stop rendering whatever `remote` was sending.
    fn remove_remote(&self, remote: ConnectionId);
}

/// Outbound half of the signaling socket.
pub trait SignalSink {
    fn send(&self, event: ClientEvent) -> Result<(), ClientError>;
}
