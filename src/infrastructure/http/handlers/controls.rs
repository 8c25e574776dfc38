//! Control HTTP Handlers
//!
//! 激活后立即返回，播放在后台进行；状态变化通过 WebSocket 推送

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ActivateControl, Activation, ControlState};
use crate::infrastructure::http::dto::{
    ActivateControlRequest, ActivateControlResponse, ApiResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 激活台词播放控件
///
/// 加载状态在返回前已原子地设置，同一控件的并发激活只有一个被接受
pub async fn activate_control(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActivateControlRequest>,
) -> Result<Json<ApiResponse<ActivateControlResponse>>, ApiError> {
    let command = ActivateControl {
        control_id: req.control_id,
    };

    let handler = state.activate_control_handler.clone();
    let (accepted, control_state) = match handler.start(&command)? {
        Activation::Started(started) => {
            tokio::spawn(async move {
                handler.complete(started).await;
            });
            (true, ControlState::Loading)
        }
        Activation::Rejected(outcome) => {
            tracing::debug!(
                control_id = %command.control_id,
                outcome = ?outcome,
                "Control activation rejected"
            );
            (false, handler.state(&command.control_id))
        }
    };

    Ok(Json(ApiResponse::success(ActivateControlResponse {
        control_id: command.control_id,
        accepted,
        state: control_state,
    })))
}
