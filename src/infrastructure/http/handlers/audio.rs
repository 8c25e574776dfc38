//! Audio Handlers
//!
//! 播放期间提供临时音频，撤销后返回 404

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::infrastructure::http::state::AppState;

/// 获取临时音频
pub async fn get_clip(State(state): State<Arc<AppState>>, Path(clip_id): Path<Uuid>) -> Response {
    let Some(clip) = state.clip_store.get(&clip_id) else {
        tracing::debug!(clip_id = %clip_id, "Clip not found or already released");
        return StatusCode::NOT_FOUND.into_response();
    };

    (
        [
            (header::CONTENT_TYPE, clip.format.mime_type().to_string()),
            (header::CONTENT_LENGTH, clip.data.len().to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from(clip.data.as_ref().clone()),
    )
        .into_response()
}
