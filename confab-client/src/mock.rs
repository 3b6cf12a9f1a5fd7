use crate::error::ClientError;
use crate::media::MediaKind;
use crate::platform::{MediaPlatform, MediaTransport, SignalSink};
use async_trait::async_trait;
use confab_core::{
    ClientEvent, ConnectionId, IceCandidate, IceServerConfig, SdpKind, SessionDescription,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(ConnectionId),
    SetTracks(ConnectionId, Vec<String>),
    CreateOffer(ConnectionId),
    CreateAnswer(ConnectionId),
    ApplyRemote(ConnectionId, SdpKind),
    AddCandidate(ConnectionId, String),
    CloseTransport(ConnectionId),
    Acquire(MediaKind),
    Stop(String),
    RenderLocal(Vec<String>),
    RemoveRemote(ConnectionId),
}

#[derive(Debug, Clone, Default)]
pub struct Calls(Rc<RefCell<Vec<Call>>>);

impl Calls {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

#[derive(Debug, Default)]
pub struct Switches {
    pub fail_offers: Cell<bool>,
    pub deny: Cell<Option<MediaKind>>,
}

pub struct MockTransport {
    remote: ConnectionId,
    calls: Calls,
    switches: Rc<Switches>,
}

#[async_trait(?Send)]
impl MediaTransport for MockTransport {
    type Track = String;

    fn set_local_tracks(&self, tracks: &[String]) {
        self.calls.push(Call::SetTracks(self.remote, tracks.to_vec()));
    }

    async fn create_offer(&self) -> Result<SessionDescription, ClientError> {
        self.calls.push(Call::CreateOffer(self.remote));
        if self.switches.fail_offers.get() {
            return Err(ClientError::Transport("offer rejected".to_owned()));
        }
        Ok(SessionDescription::offer(format!("offer-to-{}", self.remote)))
    }

    async fn create_answer(&self) -> Result<SessionDescription, ClientError> {
        self.calls.push(Call::CreateAnswer(self.remote));
        Ok(SessionDescription::answer(format!("answer-to-{}", self.remote)))
    }

    async fn apply_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), ClientError> {
        self.calls.push(Call::ApplyRemote(self.remote, description.kind));
        Ok(())
    }

    async fn add_candidate(&self, candidate: &IceCandidate) -> Result<(), ClientError> {
        self.calls
            .push(Call::AddCandidate(self.remote, candidate.candidate.clone()));
        if candidate.candidate.starts_with("bad") {
            return Err(ClientError::Transport("malformed candidate".to_owned()));
        }
        Ok(())
    }

    fn close(&self) {
        self.calls.push(Call::CloseTransport(self.remote));
    }
}

#[derive(Default)]
pub struct MockPlatform {
    pub calls: Calls,
    pub switches: Rc<Switches>,
}

#[async_trait(?Send)]
impl MediaPlatform for MockPlatform {
    type Track = String;
    type Transport = MockTransport;

    fn open_transport(
        &self,
        remote: ConnectionId,
        _ice_servers: &[IceServerConfig],
    ) -> Result<MockTransport, ClientError> {
        self.calls.push(Call::Open(remote));
        Ok(MockTransport {
            remote,
            calls: self.calls.clone(),
            switches: self.switches.clone(),
        })
    }

    async fn acquire(&self, kind: MediaKind) -> Result<String, ClientError> {
        self.calls.push(Call::Acquire(kind));
        if self.switches.deny.get() == Some(kind) {
            return Err(ClientError::MediaPermissionDenied(kind));
        }
        Ok(format!("{:?}-track", kind).to_lowercase())
    }

    fn stop_track(&self, track: &String) {
        self.calls.push(Call::Stop(track.clone()));
    }

    fn render_local(&self, tracks: &[String]) {
        self.calls.push(Call::RenderLocal(tracks.to_vec()));
    }

    fn remove_remote(&self, remote: ConnectionId) {
        self.calls.push(Call::RemoveRemote(remote));
    }
}

#[derive(Default)]
pub struct MockSink {
    sent: RefCell<Vec<ClientEvent>>,
}

impl MockSink {
    pub fn take(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }
}

impl SignalSink for MockSink {
    fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.sent.borrow_mut().push(event);
        Ok(())
    }
}
