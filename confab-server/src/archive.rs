use confab_core::ChatMessage;

/// Attachment point for chat durability.
///
/// Called from the hub for every relayed chat message. Implementations must
/// return immediately; anything slow belongs on a task of its own.
pub trait ChatArchive: Send + Sync {
    fn record(&self, message: &ChatMessage);
}

/// Keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoArchive;

impl ChatArchive for NoArchive {
    fn record(&self, _message: &ChatMessage) {}
}
