use std::fmt;
use thiserror::Error;

/// Which side sent the first offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Initiator: local offer is out, waiting for the answer.
    OfferSent,
    /// Responder: link exists because the remote spoke first.
    AwaitingOffer,
    /// Responder: answer is out, waiting for the media path.
    AnswerSent,
    /// Initiator: answer applied, waiting for the media path.
    AnswerApplied,
}

/// Negotiation state of one peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Absent,
    Negotiating { role: Role, stage: Stage },
    /// `renegotiating` is set while a locally started re-offer is unanswered.
    Connected { renegotiating: bool },
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerInput {
    InitiateOffer,
    RemoteSignalFirst,
    OfferReceived,
    AnswerReceived,
    Renegotiate,
    /// Drop our unanswered re-offer so a crossing remote offer can land.
    RollbackOffer,
    MediaPathEstablished,
    Candidate,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal transition: {input:?} in state {from}")]
pub struct IllegalTransition {
    pub from: PeerState,
    pub input: PeerInput,
}

impl PeerState {
    pub fn apply(self, input: PeerInput) -> Result<PeerState, IllegalTransition> {
        use PeerInput::*;
        use PeerState::*;

        let next = match (self, input) {
            (_, Close) => Closed,

            (Absent, InitiateOffer) => Negotiating {
                role: Role::Initiator,
                stage: Stage::OfferSent,
            },
            (Absent, RemoteSignalFirst) => Negotiating {
                role: Role::Responder,
                stage: Stage::AwaitingOffer,
            },

            (
                Negotiating {
                    role: Role::Responder,
                    stage: Stage::AwaitingOffer,
                },
                OfferReceived,
            ) => Negotiating {
                role: Role::Responder,
                stage: Stage::AnswerSent,
            },
            (
                Connected {
                    renegotiating: false,
                },
                OfferReceived,
            ) => Connected {
                renegotiating: false,
            },

            (
                Negotiating {
                    role: Role::Initiator,
                    stage: Stage::OfferSent,
                },
                AnswerReceived,
            ) => Negotiating {
                role: Role::Initiator,
                stage: Stage::AnswerApplied,
            },
            (
                Connected {
                    renegotiating: true,
                },
                AnswerReceived,
            ) => Connected {
                renegotiating: false,
            },

            (
                Connected {
                    renegotiating: false,
                },
                Renegotiate,
            ) => Connected {
                renegotiating: true,
            },
            (
                Connected {
                    renegotiating: true,
                },
                RollbackOffer,
            ) => Connected {
                renegotiating: false,
            },

            (
                Negotiating {
                    stage: Stage::AnswerSent | Stage::AnswerApplied,
                    ..
                },
                MediaPathEstablished,
            ) => Connected {
                renegotiating: false,
            },
            (state @ Connected { .. }, MediaPathEstablished) => state,

            (state @ (Negotiating { .. } | Connected { .. }), Candidate) => state,

            (from, input) => return Err(IllegalTransition { from, input }),
        };

        Ok(next)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, PeerState::Closed)
    }

    /// Negotiating or connected: the link carries local media.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            PeerState::Negotiating { .. } | PeerState::Connected { .. }
        )
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerState::Absent => write!(f, "absent"),
            PeerState::Negotiating { role, stage } => {
                write!(f, "negotiating({:?}, {:?})", role, stage)
            }
            PeerState::Connected { renegotiating } => {
                write!(f, "connected(renegotiating: {})", renegotiating)
            }
            PeerState::Closed => write!(f, "closed"),
        }
    }
}
