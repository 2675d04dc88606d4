//! Agent registry endpoints

use super::{ApiError, ApiResult, AppState, api_error};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AgentList {
    pub agents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedAgent {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RunActionRequest {
    pub action: String,
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub result: String,
}

/// GET /api/agents
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentList> {
    Json(AgentList {
        agents: state.list_agents().await,
    })
}

/// POST /api/agents
pub async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<CreatedAgent>), ApiError> {
    let name = request.name.trim().to_string();
    state
        .register_agent(&name, request.capabilities)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(CreatedAgent { name })))
}

/// POST /api/agents/:name/run
pub async fn run_action(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RunActionRequest>,
) -> ApiResult<ActionResult> {
    let result = state
        .run_action(&name, &request.action, request.payload.as_deref())
        .await
        .map_err(api_error)?;
    Ok(Json(ActionResult { result }))
}

pub fn agent_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/agents/:name/run", post(run_action))
        .with_state(state)
}
