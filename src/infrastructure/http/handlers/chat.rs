//! Chat HTTP Handlers
//!
//! 宿主前端把已渲染的消息同步到这里；注入结果按消息读取

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetMessage, MessageView};
use crate::domain::{ChatMessage, MessageId};
use crate::infrastructure::http::dto::{
    ApiResponse, Empty, IdentityRequest, RemoveMessageRequest, RemoveMessageResponse,
    UpsertMessageRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 设置当前用户名和主角色名
pub async fn set_identity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdentityRequest>,
) -> Json<ApiResponse<Empty>> {
    tracing::debug!(
        user_name = ?req.user_name,
        character_name = ?req.character_name,
        "Chat identity updated"
    );
    state
        .chat_surface
        .set_identity(req.user_name, req.character_name);
    Json(ApiResponse::ok())
}

/// 新增或更新一条已渲染的消息
pub async fn upsert_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertMessageRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    if req.id.trim().is_empty() {
        return Err(ApiError::BadRequest("Message id is required".to_string()));
    }

    state.chat_surface.upsert_message(ChatMessage::from(req));
    Ok(Json(ApiResponse::ok()))
}

/// 移除一条消息
pub async fn remove_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveMessageRequest>,
) -> Json<ApiResponse<RemoveMessageResponse>> {
    let removed = state.chat_surface.remove_message(&MessageId::new(req.id));
    Json(ApiResponse::success(RemoveMessageResponse { removed }))
}

/// 获取消息的注入结果
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageView>>, ApiError> {
    let view = state.get_message_handler.handle(GetMessage {
        message_id: MessageId::new(id),
    })?;
    Ok(Json(ApiResponse::success(view)))
}
