use anyhow::Result;
use std::sync::{Arc, Mutex};

use confab_core::{ChatMessage, ServerEvent};
use confab_server::ChatArchive;

use crate::integration::{create_test_hub_with_archive, init_tracing};
use crate::utils::TestClient;

#[derive(Default)]
struct RecordingArchive {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ChatArchive for RecordingArchive {
    fn record(&self, message: &ChatMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

#[tokio::test]
async fn test_chat_reaches_every_member_including_sender() -> Result<()> {
    init_tracing();
    let archive = Arc::new(RecordingArchive::default());
    let service = create_test_hub_with_archive(archive.clone());

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;
    let mut outsider = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    b.join("R1", "bob").await?;
    outsider.join("R2", "eve").await?;
    a.drain().await?;
    b.drain().await?;
    outsider.drain().await?;

    let sent = a.chat("R1", "alice", "hello").await?;

    assert_eq!(a.drain().await?, vec![ServerEvent::ChatMessage(sent.clone())]);
    assert_eq!(b.drain().await?, vec![ServerEvent::ChatMessage(sent.clone())]);
    assert!(outsider.drain().await?.is_empty());
    assert_eq!(*archive.messages.lock().unwrap(), vec![sent]);

    Ok(())
}

#[tokio::test]
async fn test_chat_to_empty_room_is_archived_but_undelivered() -> Result<()> {
    init_tracing();
    let archive = Arc::new(RecordingArchive::default());
    let service = create_test_hub_with_archive(archive.clone());

    let mut a = TestClient::connect(&service).await?;
    a.chat("nowhere", "alice", "anyone?").await?;

    assert!(a.drain().await?.is_empty());
    assert_eq!(archive.messages.lock().unwrap().len(), 1);

    Ok(())
}
