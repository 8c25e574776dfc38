//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{ControlId, ControlState, ParticipantRow};
use crate::domain::ChatMessage;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Chat DTOs
// ============================================================================

/// 当前身份
#[derive(Debug, Deserialize)]
pub struct IdentityRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub character_name: Option<String>,
}

/// 新增或更新一条已渲染的消息
#[derive(Debug, Deserialize)]
pub struct UpsertMessageRequest {
    pub id: String,
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub in_progress: bool,
}

impl From<UpsertMessageRequest> for ChatMessage {
    fn from(req: UpsertMessageRequest) -> Self {
        let message = ChatMessage::new(req.id, req.sender, req.content);
        if req.in_progress {
            message.streaming()
        } else {
            message
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveMessageRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveMessageResponse {
    pub removed: bool,
}

// ============================================================================
// Participant DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ParticipantsParams {
    /// 为未分配的参与者写入兜底音色
    #[serde(default)]
    pub fill_defaults: bool,
}

#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub rows: Vec<ParticipantRow>,
    pub empty_message: Option<String>,
    /// 本次写入的兜底分配数量
    pub filled: usize,
}

#[derive(Debug, Deserialize)]
pub struct AssignVoiceRequest {
    pub name: String,
    pub voice: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewVoiceRequest {
    pub name: String,
    /// 当前选中（未必已保存）的音色
    pub voice: String,
}

// ============================================================================
// Control DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ActivateControlRequest {
    pub control_id: ControlId,
}

#[derive(Debug, Serialize)]
pub struct ActivateControlResponse {
    pub control_id: ControlId,
    /// false 表示控件正忙，本次激活被忽略
    pub accepted: bool,
    pub state: ControlState,
}
