//! In-Memory Chat Surface Implementation
//!
//! 宿主前端通过 HTTP 推送已渲染的消息，这里保存其镜像；
//! 每次变化都会向聊天观察者发送一条变更通知

use std::sync::RwLock;
use tokio::sync::mpsc;

use crate::application::ports::ChatSurfacePort;
use crate::domain::{ChatMessage, ChatSnapshot, MessageId};

/// 聊天界面变更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMutation {
    MessageUpserted(MessageId),
    MessageRemoved(MessageId),
    IdentityChanged,
}

/// 内存聊天界面
pub struct InMemoryChatSurface {
    snapshot: RwLock<ChatSnapshot>,
    /// 变更通知发送端
    mutation_sender: mpsc::Sender<ChatMutation>,
}

impl InMemoryChatSurface {
    pub fn new(mutation_sender: mpsc::Sender<ChatMutation>) -> Self {
        Self {
            snapshot: RwLock::new(ChatSnapshot::default()),
            mutation_sender,
        }
    }

    /// 设置当前用户名和主角色名
    pub fn set_identity(&self, user_name: Option<String>, character_name: Option<String>) {
        {
            let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            snapshot.user_name = user_name;
            snapshot.character_name = character_name;
        }
        self.notify(ChatMutation::IdentityChanged);
    }

    /// 新增或替换一条消息，已有消息保持原有位置
    pub fn upsert_message(&self, message: ChatMessage) {
        let id = message.id.clone();
        {
            let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            match snapshot.messages.iter_mut().find(|m| m.id == message.id) {
                Some(existing) => *existing = message,
                None => snapshot.messages.push(message),
            }
        }
        self.notify(ChatMutation::MessageUpserted(id));
    }

    /// 移除一条消息，返回是否存在
    pub fn remove_message(&self, id: &MessageId) -> bool {
        let removed = {
            let mut snapshot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
            let before = snapshot.messages.len();
            snapshot.messages.retain(|m| &m.id != id);
            snapshot.messages.len() != before
        };
        if removed {
            self.notify(ChatMutation::MessageRemoved(id.clone()));
        }
        removed
    }

    fn notify(&self, mutation: ChatMutation) {
        // 队列已满时丢弃，排队中的通知会触发完整扫描
        if let Err(e) = self.mutation_sender.try_send(mutation) {
            tracing::trace!(error = %e, "Chat mutation not queued");
        }
    }
}

impl ChatSurfacePort for InMemoryChatSurface {
    fn snapshot(&self) -> ChatSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_keeps_order_and_notifies() {
        let (tx, mut rx) = mpsc::channel(16);
        let surface = InMemoryChatSurface::new(tx);

        surface.upsert_message(ChatMessage::new("1", "Bob", "a"));
        surface.upsert_message(ChatMessage::new("2", "Bob", "b"));
        surface.upsert_message(ChatMessage::new("1", "Bob", "c"));

        let snapshot = surface.snapshot();
        let contents: Vec<&str> = snapshot.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["c", "b"]);

        assert_eq!(
            rx.recv().await,
            Some(ChatMutation::MessageUpserted(MessageId::new("1")))
        );
        assert_eq!(
            rx.recv().await,
            Some(ChatMutation::MessageUpserted(MessageId::new("2")))
        );
    }

    #[tokio::test]
    async fn test_remove_unknown_does_not_notify() {
        let (tx, mut rx) = mpsc::channel(16);
        let surface = InMemoryChatSurface::new(tx);

        assert!(!surface.remove_message(&MessageId::new("404")));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_does_not_block() {
        let (tx, _rx) = mpsc::channel(1);
        let surface = InMemoryChatSurface::new(tx);
        surface.set_identity(Some("Me".to_string()), None);
        surface.set_identity(Some("Me".to_string()), Some("Alice".to_string()));
        assert_eq!(surface.snapshot().character_name.as_deref(), Some("Alice"));
    }
}
