//! API handlers for the barista server.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use barista_agent::{ToolDefinition, ToolError, COMPANY_NAME};
use barista_types::OrderRecord;
use barista_voice::{EventChannel, FanoutChannel, RoomDataChannel};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Response body for `GET /api/agent`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentInfoResponse {
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub instructions: String,
    pub tools: Vec<Value>,
}

/// Request body for a tool call from the voice runtime.
#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    /// Room the calling session runs in. When present and LiveKit is
    /// configured, saved orders are also announced to that room.
    #[serde(default)]
    pub room: Option<String>,
    /// Tool arguments as produced by the language model.
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

fn empty_arguments() -> Value {
    Value::Object(Default::default())
}

/// Response body for a tool call: the text the runtime speaks back.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub result: String,
}

/// Query parameters for `GET /api/connection-details`.
#[derive(Debug, Deserialize)]
pub struct ConnectionDetailsQuery {
    pub room: Option<String>,
    pub name: Option<String>,
}

/// Everything the frontend needs to join a room.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionDetailsResponse {
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(rename = "participantName")]
    pub participant_name: String,
    #[serde(rename = "participantToken")]
    pub participant_token: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::UnknownTool(_) => ApiError::NotFound(e.to_string()),
            ToolError::InvalidArguments { .. } | ToolError::EmptyField { .. } => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}

/// Handler for `GET /api/agent`.
pub async fn get_agent_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<AgentInfoResponse>, ApiError> {
    let tools = state
        .agent
        .tool_definitions()
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::InternalServerError(format!("tool encoding failed: {}", e)))?;

    Ok(Json(AgentInfoResponse {
        company_name: COMPANY_NAME.to_string(),
        instructions: state.agent.instructions().to_string(),
        tools,
    }))
}

/// Handler for `POST /api/agent/tools/{toolName}`.
///
/// Builds the session's event channel (the local event stream, plus the
/// LiveKit room when one is named) and runs the tool against it.
pub async fn call_tool_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(tool_name): Path<String>,
    Json(payload): Json<ToolCallRequest>,
) -> Result<Json<ToolCallResponse>, ApiError> {
    let mut channel = FanoutChannel::new().with(Arc::new(state.local_events.clone()));

    if let Some(room) = payload.room.as_deref().filter(|r| !r.trim().is_empty()) {
        if state.voice_service.is_enabled() {
            channel = channel.with(Arc::new(RoomDataChannel::new(
                state.voice_service.clone(),
                room,
            )));
        } else {
            tracing::warn!(room, "LiveKit not configured, room will not receive agent events");
        }
    }

    tracing::info!(tool = %tool_name, channel = %channel.describe(), "tool call");

    let result = state
        .agent
        .dispatch(
            &tool_name,
            payload.arguments,
            Some(&channel as &dyn EventChannel),
        )
        .await?;

    Ok(Json(ToolCallResponse { result }))
}

/// Handler for `GET /api/connection-details`.
pub async fn connection_details_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ConnectionDetailsQuery>,
) -> Result<Json<ConnectionDetailsResponse>, ApiError> {
    if !state.voice_service.is_enabled() {
        return Err(ApiError::ServiceUnavailable(
            "LiveKit is not configured".to_string(),
        ));
    }

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let room_name = query
        .room
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| format!("barista_room_{}", &suffix[..8]));
    let participant_name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "user".to_string());
    let identity = format!("voice_assistant_user_{}", &suffix[8..16]);

    let participant_token = state
        .voice_service
        .generate_join_token(&room_name, &identity, &participant_name)
        .map_err(|e| ApiError::InternalServerError(format!("token generation failed: {}", e)))?;

    tracing::info!(room = %room_name, identity = %identity, "issued connection details");

    Ok(Json(ConnectionDetailsResponse {
        server_url: state.voice_service.get_url().to_string(),
        room_name,
        participant_name,
        participant_token,
    }))
}

/// Handler for `GET /api/orders/latest`.
pub async fn latest_order_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<OrderRecord>, ApiError> {
    match state.agent.store().load_latest().await {
        Ok(Some(stored)) => Ok(Json(stored.record)),
        Ok(None) => Err(ApiError::NotFound("no orders yet".to_string())),
        Err(e) => {
            tracing::error!("failed to load latest order: {}", e);
            Err(ApiError::InternalServerError(
                "failed to load latest order".to_string(),
            ))
        }
    }
}
