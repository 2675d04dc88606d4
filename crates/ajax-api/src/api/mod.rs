//! HTTP routes over the chat service
//!
//! Handlers are thin: they decode JSON, call [`ChatService`] and map
//! [`AjaxError`] variants onto status codes. Only malformed requests and the
//! few errors the service surfaces directly become HTTP errors; everything
//! that goes wrong inside a chat turn is already reply text.

pub mod agents;
pub mod chat;
pub mod status;
pub mod tasks;

use ajax_common::AjaxError;
use ajax_core::ChatService;
use axum::{Json, Router, http::StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

pub type AppState = Arc<ChatService>;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Map a service error to a status code and `{ "error": ... }` body
pub fn api_error(e: AjaxError) -> ApiError {
    let status = match &e {
        AjaxError::EmptyInput => StatusCode::BAD_REQUEST,
        AjaxError::UnknownAgent(_) | AjaxError::NotFound(_) => StatusCode::NOT_FOUND,
        AjaxError::DuplicateName(_) => StatusCode::CONFLICT,
        AjaxError::Tool(_) | AjaxError::Provider(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", e);
    }
    (status, Json(json!({ "error": e.to_string() })))
}

/// All API routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(chat::chat_routes(state.clone()))
        .merge(agents::agent_routes(state.clone()))
        .merge(status::status_routes(state.clone()))
        .merge(tasks::task_routes(state))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(api_error(AjaxError::EmptyInput).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error(AjaxError::UnknownAgent("x".to_string())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            api_error(AjaxError::DuplicateName("x".to_string())).0,
            StatusCode::CONFLICT
        );
        let (status, Json(body)) = api_error(AjaxError::Storage("disk full".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("disk full"));
    }
}
