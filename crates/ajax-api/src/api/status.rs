//! Status, mode and presence endpoints

use super::AppState;
use ajax_common::Mode;
use ajax_core::StatusSnapshot;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ModeResponse {
    pub mode: Mode,
    pub is_principal_present: bool,
}

#[derive(Debug, Deserialize)]
pub struct PresenceRequest {
    pub present: bool,
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.status().await)
}

/// GET /api/mode
pub async fn mode(State(state): State<AppState>) -> Json<ModeResponse> {
    let mode = state.mode();
    Json(ModeResponse {
        mode,
        is_principal_present: mode.is_principal_present(),
    })
}

/// POST /api/presence
pub async fn presence(
    State(state): State<AppState>,
    Json(request): Json<PresenceRequest>,
) -> Json<ModeResponse> {
    state.set_principal_present(request.present).await;
    info!("Presence set to {} over the API", request.present);
    mode(State(state)).await
}

pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/mode", get(mode))
        .route("/api/presence", post(presence))
        .with_state(state)
}
