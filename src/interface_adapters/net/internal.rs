use crate::interface_adapters::http::error_response;
use crate::interface_adapters::net::client::spawn_session_serializer;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{GameEvent, RegistryError};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::warn;

#[derive(Debug, serde::Deserialize)]
pub struct SessionInitRequest {
    session_id: String,
}

#[derive(Debug, serde::Serialize)]
struct SessionInitResponse {
    session_id: String,
    level_count: usize,
}

#[derive(Debug, serde::Deserialize)]
pub struct SelectLevelRequest {
    level: usize,
}

#[derive(Debug, serde::Serialize)]
struct SelectLevelResponse {
    level: usize,
}

pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SessionInitRequest>,
) -> impl IntoResponse {
    let session_id = payload.session_id.trim().to_string();
    if session_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "session_id is required");
    }

    match state
        .session_registry
        .create_session(session_id.clone())
        .await
    {
        Ok(session) => {
            // Serializer first so clients can subscribe immediately.
            spawn_session_serializer(&session);
            (
                StatusCode::CREATED,
                Json(SessionInitResponse {
                    session_id,
                    level_count: session.level_count,
                }),
            )
                .into_response()
        }
        Err(RegistryError::AlreadyExists) => {
            error_response(StatusCode::CONFLICT, "session already exists")
        }
        Err(e @ RegistryError::Sim(_)) => {
            warn!(error = %e, "session creation failed");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    if session_id == *state.default_session_id {
        return error_response(StatusCode::FORBIDDEN, "default session cannot be removed");
    }
    if state.session_registry.remove_session(&session_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "session not found")
    }
}

pub async fn select_level_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<SelectLevelRequest>,
) -> impl IntoResponse {
    let Some(session) = state.session_registry.get_session(&session_id).await else {
        return error_response(StatusCode::NOT_FOUND, "session not found");
    };

    let (reply_tx, reply_rx) = oneshot::channel();
    let event = GameEvent::SelectLevel {
        level: payload.level,
        reply: Some(reply_tx),
    };
    if session.input_tx.send(event).await.is_err() {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "session is not running");
    }

    match reply_rx.await {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(SelectLevelResponse {
                level: payload.level,
            }),
        )
            .into_response(),
        Ok(Err(e)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Err(_) => error_response(StatusCode::SERVICE_UNAVAILABLE, "session is not running"),
    }
}
