use crate::SignalingService;
use crate::signaling::ws_handler;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use confab_core::{MemberRecord, RoomId};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
    pub rooms: usize,
}

pub fn router(service: SignalingService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/rooms/{room_id}/members", get(room_members))
        .layer(cors)
        .with_state(service)
}

async fn health(
    State(service): State<SignalingService>,
) -> Result<Json<HealthReport>, StatusCode> {
    let stats = service.stats().await.map_err(|e| {
        error!("Health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: stats.connections,
        rooms: stats.rooms,
    }))
}

async fn room_members(
    Path(room_id): Path<String>,
    State(service): State<SignalingService>,
) -> Result<Json<Vec<MemberRecord>>, StatusCode> {
    service
        .members(RoomId::from(room_id))
        .await
        .map(Json)
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}
