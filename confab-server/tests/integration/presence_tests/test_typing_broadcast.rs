use anyhow::Result;

use confab_core::ServerEvent;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::TestClient;

#[tokio::test]
async fn test_typing_reaches_others_but_not_sender() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;
    let mut c = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    b.join("R1", "bob").await?;
    c.join("R1", "carol").await?;
    a.drain().await?;
    b.drain().await?;
    c.drain().await?;

    a.typing("R1", "alice", true).await?;
    a.typing("R1", "alice", false).await?;

    for client in [&mut b, &mut c] {
        let events = client.drain().await?;
        let flags: Vec<bool> = events
            .iter()
            .map(|e| match e {
                ServerEvent::Typing(notice) => notice.is_typing,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(flags, vec![true, false]);
    }
    assert!(a.drain().await?.is_empty());

    Ok(())
}
