use anyhow::Result;

use confab_core::ServerEvent;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{TestClient, is_user_joined, snapshot_ids};

#[tokio::test]
async fn test_joiner_gets_snapshot_and_others_get_user_joined() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;

    a.join("R1", "alice").await?;
    let snapshot = a.next_event().await?;
    assert_eq!(snapshot_ids(&snapshot), Some(vec![]));

    b.join("R1", "bob").await?;
    let snapshot = b.next_event().await?;
    assert_eq!(snapshot_ids(&snapshot), Some(vec![a.id]));

    let announced = a.next_event().await?;
    assert!(is_user_joined(&announced, b.id));
    match announced {
        ServerEvent::UserJoined { room_id, member } => {
            assert_eq!(room_id.as_str(), "R1");
            assert_eq!(member.display_name, "bob");
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The joiner never hears about itself.
    assert!(b.drain().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_duplicate_join_only_refreshes_snapshot() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    b.join("R1", "bob").await?;
    a.drain().await?;
    b.drain().await?;

    b.join("R1", "bob").await?;

    let b_events = b.drain().await?;
    assert_eq!(b_events.len(), 1);
    assert_eq!(snapshot_ids(&b_events[0]), Some(vec![a.id]));
    assert!(a.drain().await?.is_empty());
    assert_eq!(service.members("R1".into()).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_rooms_are_isolated() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    a.drain().await?;

    b.join("R2", "bob").await?;

    assert_eq!(snapshot_ids(&b.next_event().await?), Some(vec![]));
    assert!(a.drain().await?.is_empty());

    Ok(())
}
