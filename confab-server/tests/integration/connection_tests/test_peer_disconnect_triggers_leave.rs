use anyhow::Result;

use confab_core::RoomId;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{TestClient, is_user_left};

#[tokio::test]
async fn test_disconnect_announces_departure_to_remaining_members() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let mut a = TestClient::connect(&service).await?;
    let mut b = TestClient::connect(&service).await?;
    let c = TestClient::connect(&service).await?;
    let c_id = c.id;

    a.join("R1", "alice").await?;
    b.join("R1", "bob").await?;
    c.join("R1", "carol").await?;
    a.drain().await?;
    b.drain().await?;

    c.disconnect().await?;

    let a_events = a.drain().await?;
    let b_events = b.drain().await?;
    assert_eq!(a_events.len(), 1);
    assert!(is_user_left(&a_events[0], c_id));
    assert_eq!(b_events.len(), 1);
    assert!(is_user_left(&b_events[0], c_id));

    let members: Vec<_> = service
        .members(RoomId::from("R1"))
        .await?
        .into_iter()
        .map(|m| m.connection_id)
        .collect();
    assert_eq!(members, vec![a.id, b.id]);

    Ok(())
}

#[tokio::test]
async fn test_last_member_leaving_drops_the_room() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let a = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    assert_eq!(service.stats().await?.rooms, 1);

    a.leave("R1", "alice").await?;

    assert_eq!(service.stats().await?.rooms, 0);
    assert!(service.members(RoomId::from("R1")).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_double_disconnect_is_harmless() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let a = TestClient::connect(&service).await?;
    let id = a.id;
    a.disconnect().await?;
    service.disconnect(id).await?;

    assert_eq!(service.stats().await?.connections, 0);

    Ok(())
}
