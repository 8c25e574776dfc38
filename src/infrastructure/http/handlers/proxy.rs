//! Speech Proxy Handler
//!
//! 同源代理：前端不能直接跨域请求语音服务时，由这里转发。
//! 上游的 HTTP 状态原样返回，调用方据此判断成功与否

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::SpeechError;
use crate::infrastructure::adapters::ProxySpeechPayload;
use crate::infrastructure::http::state::AppState;

/// 转发语音合成请求
pub async fn proxy_speech(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProxySpeechPayload>,
) -> Response {
    let Some(proxy) = state.speech_proxy.as_ref() else {
        return (StatusCode::NOT_FOUND, "Speech proxy disabled").into_response();
    };

    match proxy.forward(payload).await {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, upstream.content_type)],
                Body::from(upstream.body),
            )
                .into_response()
        }
        Err(SpeechError::Timeout) => {
            tracing::warn!("Speech proxy upstream timeout");
            (StatusCode::GATEWAY_TIMEOUT, "Upstream timeout").into_response()
        }
        Err(SpeechError::InvalidRequest(msg)) => {
            tracing::warn!(error = %msg, "Speech proxy rejected request");
            (StatusCode::BAD_REQUEST, msg).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Speech proxy upstream failure");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
