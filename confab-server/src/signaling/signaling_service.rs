use crate::error::HubError;
use crate::hub::{HubCommand, HubStats};
use confab_core::{ClientEvent, ConnectionId, MemberRecord, RoomId, ServerEvent};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to the hub task. This is the axum state.
#[derive(Clone)]
pub struct SignalingService {
    hub_tx: mpsc::Sender<HubCommand>,
}

impl SignalingService {
    pub fn new(hub_tx: mpsc::Sender<HubCommand>) -> Self {
        Self { hub_tx }
    }

    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        outbound: mpsc::UnboundedSender<ServerEvent>,
    ) -> Result<(), HubError> {
        self.hub_tx
            .send(HubCommand::Connect {
                connection_id,
                outbound,
            })
            .await?;
        Ok(())
    }

    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), HubError> {
        self.hub_tx
            .send(HubCommand::Event {
                connection_id,
                event,
            })
            .await?;
        Ok(())
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.hub_tx
            .send(HubCommand::Disconnect { connection_id })
            .await?;
        Ok(())
    }

    pub async fn members(&self, room_id: RoomId) -> Result<Vec<MemberRecord>, HubError> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx
            .send(HubCommand::Members { room_id, reply })
            .await?;
        Ok(rx.await?)
    }

    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (reply, rx) = oneshot::channel();
        self.hub_tx.send(HubCommand::Stats { reply }).await?;
        Ok(rx.await?)
    }
}
