use crate::connection::ConnectionRegistry;
use confab_core::{ConnectionId, ServerEvent, SignalPayload};
use tracing::debug;

/// Forward a signaling payload to `to`, stamped with the sender.
///
/// Targets that are gone are dropped without telling the sender; late
/// negotiation messages for a departed peer are harmless.
pub fn relay(
    registry: &ConnectionRegistry,
    from: ConnectionId,
    to: ConnectionId,
    data: SignalPayload,
) -> bool {
    if !registry.contains(&to) {
        debug!(
            "Dropping {} from {} to disconnected {}",
            data.kind_name(),
            from,
            to
        );
        return false;
    }

    debug!("Relaying {} from {} to {}", data.kind_name(), from, to);
    registry.deliver(&to, ServerEvent::Signaling { from, data })
}
