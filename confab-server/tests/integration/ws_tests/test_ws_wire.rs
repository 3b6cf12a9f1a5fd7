use anyhow::Result;
use serde_json::json;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{WsClient, serve};

fn join_frame(room: &str, name: &str) -> serde_json::Value {
    json!({
        "event": "join-room",
        "data": { "room_id": room, "display_name": name }
    })
}

#[tokio::test]
async fn test_signaling_frame_reaches_target_unchanged() -> Result<()> {
    init_tracing();
    let addr = serve(create_test_hub()).await?;

    let mut a = WsClient::connect(addr).await?;
    let mut b = WsClient::connect(addr).await?;

    let payloads = [
        json!({ "sdp": { "type": "offer", "sdp": "v=0\r\no=- 1 2 IN IP4 0.0.0.0\r\n" } }),
        json!({ "candidate": {
            "candidate": "candidate:1 1 udp 2122260223 10.0.0.1 50000 typ host",
            "sdpMid": "0",
            "sdpMLineIndex": 0,
            "usernameFragment": null
        } }),
        json!({ "candidate": { "candidate": null } }),
        json!({ "candidate": null }),
    ];

    for payload in payloads {
        a.send_json(&json!({
            "event": "signaling",
            "data": { "to": b.id, "data": payload }
        }))
        .await?;

        let delivered = b.next_json().await?;
        assert_eq!(
            delivered,
            json!({
                "event": "signaling",
                "data": { "from": a.id, "data": payload }
            })
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_unparseable_frames_keep_socket_open() -> Result<()> {
    init_tracing();
    let addr = serve(create_test_hub()).await?;

    let mut a = WsClient::connect(addr).await?;

    a.send_text("not json at all").await?;
    a.send_json(&json!({ "event": "dance", "data": {} })).await?;
    a.send_json(&json!({ "event": "join-room", "data": { "room_id": 7 } }))
        .await?;
    assert!(a.drain().await?.is_empty());

    a.send_json(&join_frame("R1", "alice")).await?;
    assert_eq!(
        a.next_json().await?,
        json!({
            "event": "room-users",
            "data": { "room_id": "R1", "users": [] }
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_socket_close_announces_one_departure() -> Result<()> {
    init_tracing();
    let service = create_test_hub();
    let addr = serve(service.clone()).await?;

    let mut a = WsClient::connect(addr).await?;
    let mut b = WsClient::connect(addr).await?;
    a.send_json(&join_frame("R1", "alice")).await?;
    a.drain().await?;
    b.send_json(&join_frame("R1", "bob")).await?;
    b.drain().await?;
    a.drain().await?;

    let leaving = a.id.clone();
    a.close().await?;

    let frames = b.drain().await?;
    assert_eq!(
        frames,
        vec![json!({
            "event": "user-left",
            "data": {
                "room_id": "R1",
                "member": { "connection_id": leaving, "display_name": "alice" }
            }
        })]
    );

    let members = service.members("R1".into()).await?;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].display_name, "bob");

    Ok(())
}
