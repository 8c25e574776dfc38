//! Participant HTTP Handlers
//!
//! 设置面板：刷新参与者列表、修改音色、试听

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{
    AssignVoice, AssignVoiceResponse, FillDefaultVoices, PlaybackOutcome, PreviewVoice,
    ScanParticipants,
};
use crate::infrastructure::http::dto::{
    ApiResponse, AssignVoiceRequest, ParticipantsParams, ParticipantsResponse, PreviewVoiceRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 刷新参与者列表
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ParticipantsParams>,
) -> Json<ApiResponse<ParticipantsResponse>> {
    let filled = if params.fill_defaults {
        state.fill_default_voices_handler.handle(FillDefaultVoices)
    } else {
        0
    };

    let view = state.scan_participants_handler.handle(ScanParticipants);
    Json(ApiResponse::success(ParticipantsResponse {
        rows: view.rows,
        empty_message: view.empty_message,
        filled,
    }))
}

/// 修改参与者音色
pub async fn assign_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignVoiceRequest>,
) -> Result<Json<ApiResponse<AssignVoiceResponse>>, ApiError> {
    let response = state.assign_voice_handler.handle(AssignVoice {
        participant: req.name,
        voice: req.voice,
    })?;
    Ok(Json(ApiResponse::success(response)))
}

/// 用当前选中的音色试听
pub async fn preview_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewVoiceRequest>,
) -> Result<Json<ApiResponse<PlaybackOutcome>>, ApiError> {
    let outcome = state
        .preview_voice_handler
        .handle(PreviewVoice {
            participant: req.name,
            voice: req.voice,
        })
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}
