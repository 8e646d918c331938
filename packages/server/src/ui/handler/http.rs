//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::ChannelStatusDto, ui::state::AppState};

/// Liveness text
pub async fn index() -> &'static str {
    "Walkie signaling server is running"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current floor holder and connected participants
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ChannelStatusDto> {
    let (floor, participants) = state.get_channel_status_usecase.execute().await;
    Json(ChannelStatusDto::new(floor, participants))
}
