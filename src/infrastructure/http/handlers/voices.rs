//! Voice HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListVoices, VoiceListResponse};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 列出音色目录
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<ApiResponse<VoiceListResponse>> {
    Json(ApiResponse::success(
        state.list_voices_handler.handle(ListVoices),
    ))
}
