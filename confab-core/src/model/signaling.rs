use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            username: None,
            credential: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// `RTCSessionDescriptionInit` as browsers serialize it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// `RTCIceCandidateInit` as browsers serialize it. Fields this crate does not
/// know about are carried in `extra` so forwarding never loses them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
            username_fragment: None,
            extra: Map::new(),
        }
    }
}

/// Negotiation payload exchanged between two peers through the relay.
///
/// Serialized externally tagged: `{"sdp": {...}}` or `{"candidate": {...}}`.
/// Bodies are kept as raw JSON so the relay forwards exactly what the sender
/// wrote, nulls and unknown fields included. Peers read them through
/// [`SignalPayload::description`] and [`SignalPayload::candidate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SignalPayload {
    Sdp(Value),
    Candidate(Value),
}

impl SignalPayload {
    pub fn from_description(description: &SessionDescription) -> Result<Self, serde_json::Error> {
        Ok(SignalPayload::Sdp(serde_json::to_value(description)?))
    }

    pub fn from_candidate(candidate: &IceCandidate) -> Result<Self, serde_json::Error> {
        Ok(SignalPayload::Candidate(serde_json::to_value(candidate)?))
    }

    /// `None` for a candidate payload.
    pub fn description(&self) -> Option<Result<SessionDescription, serde_json::Error>> {
        match self {
            SignalPayload::Sdp(body) => Some(SessionDescription::deserialize(body)),
            SignalPayload::Candidate(_) => None,
        }
    }

    /// `None` for an sdp payload, `Some(Ok(None))` for end-of-candidates.
    pub fn candidate(&self) -> Option<Result<Option<IceCandidate>, serde_json::Error>> {
        match self {
            SignalPayload::Candidate(Value::Null) => Some(Ok(None)),
            SignalPayload::Candidate(body) => Some(IceCandidate::deserialize(body).map(Some)),
            SignalPayload::Sdp(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SignalPayload::Sdp(body) => match body.get("type").and_then(Value::as_str) {
                Some("offer") => "offer",
                Some("answer") => "answer",
                _ => "sdp",
            },
            SignalPayload::Candidate(Value::Null) => "end-of-candidates",
            SignalPayload::Candidate(_) => "candidate",
        }
    }
}
