use anyhow::{Context, Result};
use tokio::sync::mpsc;

use confab_core::{
    ChatMessage, ClientEvent, ConnectionId, RoomId, ServerEvent, SignalPayload, TypingNotice,
};
use confab_server::SignalingService;

use super::signal_helpers::{SIGNAL_TIMEOUT_MS, recv_with_timeout};

/// A fake socket: registers with the hub and records what the hub pushes to it.
pub struct TestClient {
    pub id: ConnectionId,
    service: SignalingService,
    events: mpsc::UnboundedReceiver<ServerEvent>,
}

impl TestClient {
    /// Register with the hub and consume the welcome frame.
    pub async fn connect(service: &SignalingService) -> Result<Self> {
        let id = ConnectionId::new();
        let (tx, events) = mpsc::unbounded_channel();
        service
            .connect(id, tx)
            .await
            .context("Failed to register test client")?;

        let mut client = Self {
            id,
            service: service.clone(),
            events,
        };

        match client.next_event().await? {
            ServerEvent::Welcome { connection_id, .. } if connection_id == id => Ok(client),
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }
    }

    pub async fn send(&self, event: ClientEvent) -> Result<()> {
        self.service
            .dispatch(self.id, event)
            .await
            .context("Failed to dispatch client event")
    }

    pub async fn join(&self, room: &str, name: &str) -> Result<()> {
        self.send(ClientEvent::JoinRoom {
            room_id: RoomId::from(room),
            display_name: name.to_owned(),
        })
        .await
    }

    pub async fn leave(&self, room: &str, name: &str) -> Result<()> {
        self.send(ClientEvent::LeaveRoom {
            room_id: RoomId::from(room),
            display_name: name.to_owned(),
        })
        .await
    }

    pub async fn signal(&self, to: ConnectionId, data: SignalPayload) -> Result<()> {
        self.send(ClientEvent::Signaling { to, data }).await
    }

    pub async fn typing(&self, room: &str, name: &str, is_typing: bool) -> Result<()> {
        self.send(ClientEvent::Typing(TypingNotice {
            room_id: RoomId::from(room),
            display_name: name.to_owned(),
            is_typing,
        }))
        .await
    }

    pub async fn chat(&self, room: &str, sender: &str, text: &str) -> Result<ChatMessage> {
        let message = ChatMessage {
            room_id: RoomId::from(room),
            sender: sender.to_owned(),
            text: text.to_owned(),
            time: "12:00".to_owned(),
        };
        self.send(ClientEvent::ChatMessage(message.clone())).await?;
        Ok(message)
    }

    /// Simulate the socket closing.
    pub async fn disconnect(self) -> Result<()> {
        self.service
            .disconnect(self.id)
            .await
            .context("Failed to send disconnect")
    }

    pub async fn next_event(&mut self) -> Result<ServerEvent> {
        recv_with_timeout(&mut self.events, SIGNAL_TIMEOUT_MS).await
    }

    /// Everything the hub has queued for this client so far.
    ///
    /// Round-trips the hub first, so every command sent before this call has
    /// been fully handled.
    pub async fn drain(&mut self) -> Result<Vec<ServerEvent>> {
        self.service.stats().await.context("Hub barrier failed")?;

        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        Ok(events)
    }
}
