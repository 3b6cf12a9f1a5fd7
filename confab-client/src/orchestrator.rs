use crate::error::ClientError;
use crate::logger::Logger;
use crate::media::{LocalMedia, MediaKind};
use crate::peer::{IllegalTransition, PeerInput, PeerLink, PeerState};
use crate::platform::{MediaPlatform, MediaTransport, SignalSink, TransportEvent};
use confab_core::utils::default_ice_servers;
use confab_core::{
    ChatMessage, ClientEvent, ConnectionId, IceCandidate, IceServerConfig, MemberRecord, RoomId,
    ServerEvent, SessionDescription, SdpKind, SignalPayload, TypingNotice,
};
use futures::StreamExt;
use futures::channel::mpsc;
use std::collections::HashMap;

/// Everything the orchestrator reacts to, funnelled through one queue.
#[derive(Debug, Clone)]
pub enum OrchestratorInput {
    Server(ServerEvent),
    Transport {
        remote: ConnectionId,
        event: TransportEvent,
    },
    Join {
        room_id: RoomId,
        display_name: String,
    },
    Leave,
    ToggleMicrophone,
    ToggleCamera,
    Chat {
        text: String,
        time: String,
    },
    Typing(bool),
}

/// Client side of a room: one [`PeerLink`] per remote participant.
pub struct PeerOrchestrator<P: MediaPlatform, S: SignalSink> {
    platform: P,
    sink: S,
    local_id: Option<ConnectionId>,
    ice_servers: Vec<IceServerConfig>,
    room: Option<RoomId>,
    display_name: String,
    roster: Vec<MemberRecord>,
    links: HashMap<ConnectionId, PeerLink<P::Transport>>,
    media: LocalMedia<P::Track>,
}

impl<P: MediaPlatform, S: SignalSink> PeerOrchestrator<P, S> {
    pub fn new(platform: P, sink: S) -> Self {
        Self {
            platform,
            sink,
            local_id: None,
            ice_servers: default_ice_servers(),
            room: None,
            display_name: String::new(),
            roster: Vec::new(),
            links: HashMap::new(),
            media: LocalMedia::new(),
        }
    }

    pub fn local_id(&self) -> Option<ConnectionId> {
        self.local_id
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    /// Other members of the active room as last reported by the server.
    pub fn roster(&self) -> &[MemberRecord] {
        &self.roster
    }

    pub fn link_state(&self, remote: &ConnectionId) -> Option<PeerState> {
        self.links.get(remote).map(PeerLink::state)
    }

    pub fn link(&self, remote: &ConnectionId) -> Option<&PeerLink<P::Transport>> {
        self.links.get(remote)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_enabled(&self, kind: MediaKind) -> bool {
        self.media.is_enabled(kind)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn handle(&mut self, input: OrchestratorInput) -> Result<(), ClientError> {
        match input {
            OrchestratorInput::Server(event) => self.handle_server_event(event).await,
            OrchestratorInput::Transport { remote, event } => {
                self.handle_transport_event(remote, event)
            }
            OrchestratorInput::Join {
                room_id,
                display_name,
            } => self.join(room_id, display_name),
            OrchestratorInput::Leave => self.leave(),
            OrchestratorInput::ToggleMicrophone => self.toggle_microphone().await.map(|_| ()),
            OrchestratorInput::ToggleCamera => self.toggle_camera().await.map(|_| ()),
            OrchestratorInput::Chat { text, time } => self.send_chat(text, time),
            OrchestratorInput::Typing(is_typing) => self.set_typing(is_typing),
        }
    }

    pub fn join(&mut self, room_id: RoomId, display_name: String) -> Result<(), ClientError> {
        if self.room.is_some() {
            self.leave()?;
        }

        Logger::info(&format!("Joining room '{}' as {}", room_id, display_name));
        self.room = Some(room_id.clone());
        self.display_name = display_name.clone();
        self.roster.clear();

        self.sink.send(ClientEvent::JoinRoom {
            room_id,
            display_name,
        })
    }

    /// Close every link and tell the server we are gone.
    pub fn leave(&mut self) -> Result<(), ClientError> {
        let Some(room_id) = self.room.take() else {
            return Ok(());
        };

        let remotes: Vec<ConnectionId> = self.links.keys().copied().collect();
        for remote in remotes {
            self.close_link(&remote);
        }
        self.roster.clear();

        Logger::info(&format!("Leaving room '{}'", room_id));
        self.sink.send(ClientEvent::LeaveRoom {
            room_id,
            display_name: self.display_name.clone(),
        })
    }

    pub fn send_chat(&mut self, text: String, time: String) -> Result<(), ClientError> {
        let Some(room_id) = self.room.clone() else {
            Logger::warn("Chat message outside of a room dropped");
            return Ok(());
        };

        self.sink.send(ClientEvent::ChatMessage(ChatMessage {
            room_id,
            sender: self.display_name.clone(),
            text,
            time,
        }))
    }

    pub fn set_typing(&mut self, is_typing: bool) -> Result<(), ClientError> {
        let Some(room_id) = self.room.clone() else {
            return Ok(());
        };

        self.sink.send(ClientEvent::Typing(TypingNotice {
            room_id,
            display_name: self.display_name.clone(),
            is_typing,
        }))
    }

    pub async fn toggle_microphone(&mut self) -> Result<bool, ClientError> {
        self.toggle(MediaKind::Audio).await
    }

    pub async fn toggle_camera(&mut self) -> Result<bool, ClientError> {
        self.toggle(MediaKind::Video).await
    }

    /// Returns whether `kind` is on afterwards. A failed acquisition leaves it off.
    async fn toggle(&mut self, kind: MediaKind) -> Result<bool, ClientError> {
        let released = if self.media.is_enabled(kind) {
            self.media.take(kind)
        } else {
            let track = self.platform.acquire(kind).await?;
            self.media.set(kind, track);
            None
        };

        let tracks = self.media.tracks();
        self.platform.render_local(&tracks);

        let mut renegotiate = Vec::new();
        for link in self.links.values() {
            match link.state() {
                PeerState::Negotiating { .. } => link.transport().set_local_tracks(&tracks),
                PeerState::Connected { .. } => {
                    link.transport().set_local_tracks(&tracks);
                    renegotiate.push(link.remote());
                }
                _ => {}
            }
        }

        if let Some(track) = released {
            self.platform.stop_track(&track);
        }

        for remote in renegotiate {
            if let Err(e) = self.renegotiate(remote).await {
                Logger::warn(&format!("Renegotiation with {} failed: {}", remote, e));
            }
        }

        Ok(self.media.is_enabled(kind))
    }

    async fn renegotiate(&mut self, remote: ConnectionId) -> Result<(), ClientError> {
        let Some(link) = self.links.get_mut(&remote) else {
            return Ok(());
        };

        let next = link.check(PeerInput::Renegotiate)?;
        let offer = link.transport().create_offer().await?;
        link.commit(next);

        self.send_signal(remote, SignalPayload::from_description(&offer)?)
    }

    /// Two re-offers crossed. The side with the lower id yields.
    fn yields_to(&self, remote: &ConnectionId) -> bool {
        self.local_id.is_some_and(|me| me < *remote)
    }

    pub async fn handle_server_event(&mut self, event: ServerEvent) -> Result<(), ClientError> {
        match event {
            ServerEvent::Welcome {
                connection_id,
                ice_servers,
            } => {
                Logger::info(&format!(
                    "Connected as {} with {} ICE servers",
                    connection_id,
                    ice_servers.len()
                ));
                self.local_id = Some(connection_id);
                if !ice_servers.is_empty() {
                    self.ice_servers = ice_servers;
                }
                Ok(())
            }

            ServerEvent::RoomUsers { room_id, users } => {
                if self.is_active_room(&room_id) {
                    self.roster = users;
                }
                Ok(())
            }

            ServerEvent::UserJoined { room_id, member } => {
                if !self.is_active_room(&room_id) || Some(member.connection_id) == self.local_id {
                    return Ok(());
                }

                let remote = member.connection_id;
                if !self.roster.iter().any(|m| m.connection_id == remote) {
                    self.roster.push(member);
                }
                if self.links.contains_key(&remote) {
                    return Ok(());
                }

                self.start_offer(remote).await
            }

            ServerEvent::UserLeft { room_id, member } => {
                if !self.is_active_room(&room_id) {
                    return Ok(());
                }

                self.roster
                    .retain(|m| m.connection_id != member.connection_id);
                self.close_link(&member.connection_id);
                Ok(())
            }

            ServerEvent::Signaling { from, data } => self.handle_signal(from, data).await,

            ServerEvent::ChatMessage(_) | ServerEvent::Typing(_) => Ok(()),
        }
    }

    pub fn handle_transport_event(
        &mut self,
        remote: ConnectionId,
        event: TransportEvent,
    ) -> Result<(), ClientError> {
        let Some(link) = self.links.get_mut(&remote) else {
            Logger::debug(&format!("Transport event for closed link {} dropped", remote));
            return Ok(());
        };

        match event {
            TransportEvent::LocalCandidate(candidate) => {
                if link.state().is_closed() {
                    return Ok(());
                }
                self.send_signal(remote, SignalPayload::from_candidate(&candidate)?)
            }
            TransportEvent::Connected => {
                link.advance(PeerInput::MediaPathEstablished)?;
                Logger::info(&format!("Media path to {} established", remote));
                Ok(())
            }
            TransportEvent::Failed => {
                Logger::warn(&format!("Connection to {} failed", remote));
                Ok(())
            }
        }
    }

    async fn start_offer(&mut self, remote: ConnectionId) -> Result<(), ClientError> {
        let mut link = self.open_link(remote, PeerInput::InitiateOffer)?;

        match link.transport().create_offer().await {
            Ok(offer) => {
                self.links.insert(remote, link);
                self.send_signal(remote, SignalPayload::from_description(&offer)?)
            }
            Err(e) => {
                link.close();
                self.platform.remove_remote(remote);
                Err(e)
            }
        }
    }

    fn open_link(
        &self,
        remote: ConnectionId,
        input: PeerInput,
    ) -> Result<PeerLink<P::Transport>, ClientError> {
        let transport = self.platform.open_transport(remote, &self.ice_servers)?;
        let mut link = PeerLink::new(remote, transport);
        link.advance(input)?;
        link.transport().set_local_tracks(&self.media.tracks());
        Ok(link)
    }

    async fn handle_signal(
        &mut self,
        from: ConnectionId,
        data: SignalPayload,
    ) -> Result<(), ClientError> {
        let incoming = Incoming::read(&data)?;

        if !self.links.contains_key(&from) {
            if let Incoming::Answer(_) = incoming {
                return Err(IllegalTransition {
                    from: PeerState::Absent,
                    input: PeerInput::AnswerReceived,
                }
                .into());
            }

            let link = self.open_link(from, PeerInput::RemoteSignalFirst)?;
            self.links.insert(from, link);
        }

        match incoming {
            Incoming::Offer(description) => self.accept_offer(from, description).await,
            Incoming::Answer(description) => {
                let Some(link) = self.links.get_mut(&from) else {
                    return Ok(());
                };
                let next = link.check(PeerInput::AnswerReceived)?;
                link.apply_remote(&description).await?;
                link.commit(next);
                Ok(())
            }
            Incoming::Candidate(candidate) => {
                let Some(link) = self.links.get_mut(&from) else {
                    return Ok(());
                };
                link.check(PeerInput::Candidate)?;
                match candidate {
                    Some(candidate) => link.accept_candidate(candidate).await,
                    None => Logger::debug(&format!("End of candidates from {}", from)),
                }
                Ok(())
            }
        }
    }

    async fn accept_offer(
        &mut self,
        from: ConnectionId,
        description: SessionDescription,
    ) -> Result<(), ClientError> {
        let yields = self.yields_to(&from);
        let Some(link) = self.links.get_mut(&from) else {
            return Ok(());
        };

        let colliding = link.state() == PeerState::Connected { renegotiating: true };
        if colliding {
            if !yields {
                Logger::debug(&format!("Ignoring crossing offer from {}", from));
                return Ok(());
            }
            Logger::info(&format!("Offer from {} crossed ours, rolling back", from));
            link.advance(PeerInput::RollbackOffer)?;
        }

        let next = link.check(PeerInput::OfferReceived)?;
        link.apply_remote(&description).await?;
        let answer = link.transport().create_answer().await?;
        link.commit(next);
        self.send_signal(from, SignalPayload::from_description(&answer)?)?;

        // Our rolled back change still has to reach the remote.
        if colliding {
            self.renegotiate(from).await?;
        }
        Ok(())
    }

    fn close_link(&mut self, remote: &ConnectionId) {
        if let Some(mut link) = self.links.remove(remote) {
            link.close();
            self.platform.remove_remote(*remote);
            Logger::info(&format!("Closed link to {}", remote));
        }
    }

    fn send_signal(&self, to: ConnectionId, data: SignalPayload) -> Result<(), ClientError> {
        self.sink.send(ClientEvent::Signaling { to, data })
    }

    fn is_active_room(&self, room_id: &RoomId) -> bool {
        self.room.as_ref() == Some(room_id)
    }
}

/// A signaling payload read into the shape the orchestrator acts on.
enum Incoming {
    Offer(SessionDescription),
    Answer(SessionDescription),
    /// `None` marks the end of the remote's candidates.
    Candidate(Option<IceCandidate>),
}

impl Incoming {
    fn read(data: &SignalPayload) -> Result<Self, ClientError> {
        if let Some(description) = data.description() {
            let description = description?;
            return Ok(match description.kind {
                SdpKind::Offer => Incoming::Offer(description),
                SdpKind::Answer => Incoming::Answer(description),
            });
        }

        let candidate = data.candidate().unwrap_or(Ok(None))?;
        Ok(Incoming::Candidate(candidate))
    }
}

/// Drive `orchestrator` until the input queue closes.
///
/// Errors never stop the loop; they go to `on_error`.
pub async fn run_orchestrator<P, S, F>(
    mut orchestrator: PeerOrchestrator<P, S>,
    mut inputs: mpsc::UnboundedReceiver<OrchestratorInput>,
    mut on_error: F,
) where
    P: MediaPlatform,
    S: SignalSink,
    F: FnMut(&ClientError),
{
    while let Some(input) = inputs.next().await {
        if let Err(e) = orchestrator.handle(input).await {
            if e.is_notice() {
                Logger::warn(&e.to_string());
            } else {
                Logger::error(&e.to_string());
            }
            on_error(&e);
        }
    }

    Logger::info("Input queue closed, orchestrator stopped");
    let _ = orchestrator.leave();
}
