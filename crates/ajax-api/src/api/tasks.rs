//! Task queue, task log and idle behaviour endpoints

use super::{ApiError, ApiResult, AppState, api_error};
use ajax_common::IdleConfig;
use ajax_core::{TaskEntry, TaskLogEntry};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub task: String,
}

/// GET /api/queue
pub async fn queue(State(state): State<AppState>) -> ApiResult<Vec<TaskEntry>> {
    state.tasks().await.map(Json).map_err(api_error)
}

/// POST /api/task
pub async fn add_task(
    State(state): State<AppState>,
    Json(request): Json<TaskRequest>,
) -> Result<(StatusCode, Json<TaskEntry>), ApiError> {
    let entry = state.queue_task(&request.task).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/tasklog
pub async fn task_log(State(state): State<AppState>) -> ApiResult<Vec<TaskLogEntry>> {
    state.task_log().await.map(Json).map_err(api_error)
}

/// GET /api/idle_behaviors
pub async fn idle_behaviors(State(state): State<AppState>) -> Json<IdleConfig> {
    Json(state.idle_config().await)
}

/// POST /api/idle_behaviors
pub async fn set_idle_behaviors(
    State(state): State<AppState>,
    Json(config): Json<IdleConfig>,
) -> ApiResult<IdleConfig> {
    state.set_idle_config(config).await.map(Json).map_err(api_error)
}

pub fn task_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/queue", get(queue))
        .route("/api/task", post(add_task))
        .route("/api/tasklog", get(task_log))
        .route("/api/idle_behaviors", get(idle_behaviors).post(set_idle_behaviors))
        .with_state(state)
}
