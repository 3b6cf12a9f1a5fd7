use crate::error::ClientError;
use crate::logger::Logger;
use crate::peer::{IllegalTransition, PeerInput, PeerState};
use crate::platform::MediaTransport;
use confab_core::{ConnectionId, IceCandidate, SessionDescription};

/// One transport to one remote participant plus its negotiation bookkeeping.
pub struct PeerLink<T> {
    remote: ConnectionId,
    transport: T,
    state: PeerState,
    remote_description_applied: bool,
    pending_candidates: Vec<IceCandidate>,
}

impl<T: MediaTransport> PeerLink<T> {
    pub fn new(remote: ConnectionId, transport: T) -> Self {
        Self {
            remote,
            transport,
            state: PeerState::Absent,
            remote_description_applied: false,
            pending_candidates: Vec::new(),
        }
    }

    pub fn remote(&self) -> ConnectionId {
        self.remote
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    /// Check `input` against the current state without committing it.
    pub fn check(&self, input: PeerInput) -> Result<PeerState, IllegalTransition> {
        self.state.apply(input)
    }

    pub fn advance(&mut self, input: PeerInput) -> Result<PeerState, IllegalTransition> {
        self.state = self.state.apply(input)?;
        Ok(self.state)
    }

    pub(crate) fn commit(&mut self, state: PeerState) {
        self.state = state;
    }

    /// Apply the remote description, then flush candidates that beat it here.
    pub async fn apply_remote(&mut self, description: &SessionDescription) -> Result<(), ClientError> {
        self.transport.apply_remote_description(description).await?;
        self.remote_description_applied = true;

        for candidate in std::mem::take(&mut self.pending_candidates) {
            self.add_candidate(&candidate).await;
        }
        Ok(())
    }

    /// Queue until a remote description exists, add otherwise.
    pub async fn accept_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_applied {
            Logger::debug(&format!(
                "Queueing candidate from {} until its description arrives",
                self.remote
            ));
            self.pending_candidates.push(candidate);
            return;
        }

        self.add_candidate(&candidate).await;
    }

    async fn add_candidate(&self, candidate: &IceCandidate) {
        if let Err(e) = self.transport.add_candidate(candidate).await {
            Logger::warn(&format!(
                "Ignoring candidate from {}: {}",
                self.remote, e
            ));
        }
    }

    /// Detach local media and release the transport.
    pub fn close(&mut self) {
        self.transport.set_local_tracks(&[]);
        self.transport.close();
        self.pending_candidates.clear();
        self.state = PeerState::Closed;
    }
}
