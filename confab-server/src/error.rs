use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error)]
pub enum HubError {
    /// The hub task has stopped; nothing can be dispatched any more.
    #[error("hub is not running")]
    HubClosed,

    #[error("configuration error: {0}")]
    Config(String),
}

impl<T> From<mpsc::error::SendError<T>> for HubError {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        HubError::HubClosed
    }
}

impl From<oneshot::error::RecvError> for HubError {
    fn from(_: oneshot::error::RecvError) -> Self {
        HubError::HubClosed
    }
}
