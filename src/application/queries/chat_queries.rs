//! Chat Queries

use crate::domain::MessageId;

/// 获取一条消息的注入结果
#[derive(Debug, Clone)]
pub struct GetMessage {
    pub message_id: MessageId,
}
