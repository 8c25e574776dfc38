//! Augmentation Store Port - 已处理消息记录
//!
//! 记录每条消息最近一次提取时的内容指纹，指纹不变即视为已处理

use serde::Serialize;

use super::ControlId;
use crate::domain::{MessageId, QuoteSpan};

/// 已处理的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AugmentedMessage {
    pub message_id: MessageId,
    /// 提取时的内容指纹
    pub fingerprint: String,
    /// 注入控件后的标记；没有任何台词时为 None（不重写消息）
    pub markup: Option<String>,
    pub spans: Vec<QuoteSpan>,
    pub controls: Vec<ControlId>,
}

/// Augmentation Store Port
pub trait AugmentationStorePort: Send + Sync {
    fn get(&self, id: &MessageId) -> Option<AugmentedMessage>;

    /// 已处理消息的指纹
    fn fingerprint(&self, id: &MessageId) -> Option<String>;

    fn put(&self, message: AugmentedMessage);

    fn remove(&self, id: &MessageId) -> Option<AugmentedMessage>;

    /// 所有已处理消息的标识
    fn ids(&self) -> Vec<MessageId>;
}
