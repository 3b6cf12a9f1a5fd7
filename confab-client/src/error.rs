use crate::media::MediaKind;
use crate::peer::IllegalTransition;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    /// Anything the underlying peer connection or socket rejected.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("permission to use the {0} was denied")]
    MediaPermissionDenied(MediaKind),

    #[error("{0} unavailable: {1}")]
    MediaUnavailable(MediaKind, String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Errors the user should see but that leave the session intact.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            ClientError::MediaPermissionDenied(_) | ClientError::MediaUnavailable(..)
        )
    }
}
