use anyhow::Result;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use confab_core::MemberRecord;
use confab_server::router;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::TestClient;

async fn get_json(app: axum::Router, uri: &str) -> Result<(StatusCode, serde_json::Value)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

#[tokio::test]
async fn test_health_reports_counts() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let a = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;

    let app = router(service.clone(), CorsLayer::permissive());
    let (status, body) = get_json(app, "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connections"], 1);
    assert_eq!(body["rooms"], 1);

    Ok(())
}

#[tokio::test]
async fn test_room_members_lists_join_order() -> Result<()> {
    init_tracing();
    let service = create_test_hub();

    let a = TestClient::connect(&service).await?;
    let b = TestClient::connect(&service).await?;
    a.join("R1", "alice").await?;
    b.join("R1", "bob").await?;

    let app = router(service.clone(), CorsLayer::permissive());
    let (status, body) = get_json(app.clone(), "/rooms/R1/members").await?;
    assert_eq!(status, StatusCode::OK);
    let members: Vec<MemberRecord> = serde_json::from_value(body)?;
    assert_eq!(
        members,
        vec![
            MemberRecord::new(a.id, "alice"),
            MemberRecord::new(b.id, "bob"),
        ]
    );

    let (status, body) = get_json(app, "/rooms/empty/members").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    Ok(())
}
