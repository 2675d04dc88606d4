//! Chat and delegation endpoints

use super::{ApiResult, AppState, api_error};
use ajax_core::ChatReply;
use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Caller identity, checked against the principal allow-list
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DelegateRequest {
    pub agent: String,
    #[serde(default)]
    pub task: String,
}

#[derive(Debug, Serialize)]
pub struct DelegateResponse {
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
}

/// POST /api/chat
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> ApiResult<ChatReply> {
    debug!(
        "Chat request for {:?} from {:?}",
        request.conversation_id, request.user
    );
    state
        .chat_as(
            request.conversation_id.as_deref(),
            &request.message,
            request.user.as_deref(),
        )
        .await
        .map(Json)
        .map_err(api_error)
}

/// POST /api/delegate
pub async fn delegate(
    State(state): State<AppState>,
    Json(request): Json<DelegateRequest>,
) -> ApiResult<DelegateResponse> {
    let result = state
        .delegate(request.agent.trim(), &request.task)
        .await
        .map_err(api_error)?;
    Ok(Json(DelegateResponse { result }))
}

/// POST /api/image
pub async fn image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> ApiResult<ImageResponse> {
    let url = state.generate_image(&request.prompt).await.map_err(api_error)?;
    Ok(Json(ImageResponse { url }))
}

pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/delegate", post(delegate))
        .route("/api/image", post(image))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_chat_round_trip() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(json!({ "message": "Schedule my meeting" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "On it, boss! — Schedule my meeting");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_empty_chat_is_bad_request() {
        let app = app().await;
        let (status, body) = send(&app, "POST", "/api/chat", Some(json!({ "message": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Empty message");

        let (status, _) = send(&app, "POST", "/api/chat", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_presence_command_over_http() {
        let app = app().await;
        let (_, body) = send(&app, "POST", "/api/chat", Some(json!({ "message": "/loganout" }))).await;
        assert_eq!(body["reply"], "Logan is away. Speaking on their behalf.");

        let (_, body) = send(&app, "GET", "/api/mode", None).await;
        assert_eq!(body["mode"], "principal");

        let (_, body) = send(
            &app,
            "POST",
            "/api/chat",
            Some(json!({ "message": "Schedule my meeting", "user": "Logan" })),
        )
        .await;
        assert_eq!(body["reply"], "On it, boss! — Schedule my meeting");
    }

    #[tokio::test]
    async fn test_delegate_endpoint() {
        let app = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/delegate",
            Some(json!({ "agent": "investor", "task": "Analyze TSLA earnings" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["result"],
            "[InvestorAgent] Processing task: Analyze TSLA earnings (stock research functionality not yet implemented)"
        );

        let (status, body) = send(
            &app,
            "POST",
            "/api/delegate",
            Some(json!({ "agent": "nobody", "task": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nobody"));
    }

    #[tokio::test]
    async fn test_image_without_tool() {
        let app = app().await;
        let (status, _) = send(&app, "POST", "/api/image", Some(json!({ "prompt": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "POST", "/api/image", Some(json!({ "prompt": "a fox" }))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }
}
