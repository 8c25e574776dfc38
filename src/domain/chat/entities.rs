//! Chat Context - Entities

use serde::{Deserialize, Serialize};

/// 消息标识（宿主界面中的消息序号或 DOM 标识）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// 已渲染的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    /// 消息整体的发送者名称（块发送者）
    pub sender: String,
    /// 渲染后的消息 HTML
    pub content: String,
    /// 是否仍在生成中
    #[serde(default)]
    pub in_progress: bool,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(id),
            sender: sender.into(),
            content: content.into(),
            in_progress: false,
        }
    }

    pub fn streaming(mut self) -> Self {
        self.in_progress = true;
        self
    }

    /// 内容指纹
    ///
    /// 发送者或正文变化时指纹随之变化，用于判断消息是否需要重新提取
    pub fn fingerprint(&self) -> String {
        let digest = md5::compute(format!("{}\u{0}{}", self.sender, self.content).as_bytes());
        format!("{:x}", digest)
    }
}

/// 聊天界面快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    /// 当前用户显示名
    pub user_name: Option<String>,
    /// 当前主角色显示名
    pub character_name: Option<String>,
    /// 当前渲染的消息（按显示顺序）
    pub messages: Vec<ChatMessage>,
}
