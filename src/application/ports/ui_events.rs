//! UI Event Port - 界面事件推送
//!
//! 控件图标变化、提示消息、临时音频可用/释放等事件

use serde::Serialize;
use uuid::Uuid;

use super::{ControlId, ControlState};
use crate::domain::MessageId;

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// 界面事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum UiEvent {
    /// 控件状态变更
    ControlStateChanged {
        control_id: ControlId,
        state: ControlState,
        icon: String,
    },
    /// 非阻塞提示
    Toast { level: ToastLevel, message: String },
    /// 临时音频可播放
    ClipReady {
        control_id: ControlId,
        clip_id: Uuid,
        url: String,
        duration_ms: u64,
    },
    /// 临时音频已释放
    ClipReleased { control_id: ControlId, clip_id: Uuid },
    /// 消息已注入播放控件
    MessageAugmented {
        message_id: MessageId,
        controls: usize,
    },
}

impl UiEvent {
    pub fn control_state(control_id: &ControlId, state: ControlState) -> Self {
        Self::ControlStateChanged {
            control_id: control_id.clone(),
            state,
            icon: state.icon().to_string(),
        }
    }

    pub fn toast(level: ToastLevel, message: impl Into<String>) -> Self {
        Self::Toast {
            level,
            message: message.into(),
        }
    }
}

/// UI Event Sink Port
pub trait UiEventSinkPort: Send + Sync {
    fn publish(&self, event: UiEvent);
}
