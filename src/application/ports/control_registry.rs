//! Control Registry Port - 播放控件状态管理
//!
//! 控件在创建时绑定台词与说话人，激活时通过绑定解析要朗读的内容

use serde::{Deserialize, Serialize};

use crate::domain::{EmbeddedControl, MessageId, QuoteSpan};

/// 控件标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 消息中第 `index` 段台词的控件
    pub fn quote(message_id: &MessageId, index: usize) -> Self {
        Self(format!("quote:{}:{}", message_id, index))
    }

    /// 设置面板中参与者的试听控件
    pub fn preview(name: &str) -> Self {
        Self(format!("preview:{}", name.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 控件状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlState {
    #[default]
    Idle,
    Loading,
    Error,
}

impl ControlState {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Idle => "🔊",
            Self::Loading => "⏳",
            Self::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Error => "error",
        }
    }
}

/// 控件绑定的台词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlBinding {
    pub message_id: MessageId,
    pub index: usize,
    pub speaker: String,
    pub text: String,
}

impl ControlBinding {
    pub fn from_span(message_id: &MessageId, span: &QuoteSpan) -> Self {
        Self {
            message_id: message_id.clone(),
            index: span.index,
            speaker: span.speaker.clone(),
            text: span.plain_text.clone(),
        }
    }

    /// 从消息中已存在的控件数据重建绑定
    pub fn from_embedded(message_id: &MessageId, control: EmbeddedControl) -> Self {
        Self {
            message_id: message_id.clone(),
            index: control.index,
            speaker: control.speaker,
            text: control.text,
        }
    }
}

/// Control Registry Port
pub trait ControlRegistryPort: Send + Sync {
    /// 绑定控件
    fn bind(&self, id: ControlId, binding: ControlBinding);

    /// 获取控件绑定
    fn binding(&self, id: &ControlId) -> Option<ControlBinding>;

    /// 解除绑定（不影响正在进行的播放状态）
    fn unbind(&self, id: &ControlId);

    /// 原子地从空闲切换到加载中
    ///
    /// 控件非空闲时返回 false
    fn try_begin(&self, id: &ControlId) -> bool;

    /// 设置控件状态
    fn set_state(&self, id: &ControlId, state: ControlState);

    /// 获取控件状态，未知控件视为空闲
    fn state(&self, id: &ControlId) -> ControlState;
}
