//! Chat Observer - 聊天界面变化驱动的调和扫描
//!
//! 启动时先执行一次扫描覆盖已有内容，之后每收到一批变更通知扫描一次。
//! 已在队列中的通知会合并到同一次扫描中。

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::commands::handlers::{ReconcileChatHandler, ReconcileReport};
use crate::application::commands::ReconcileChat;
use crate::infrastructure::memory::ChatMutation;

/// 聊天观察者
pub struct ChatObserver {
    mutations: mpsc::Receiver<ChatMutation>,
    reconciler: Arc<ReconcileChatHandler>,
}

impl ChatObserver {
    pub fn new(mutations: mpsc::Receiver<ChatMutation>, reconciler: Arc<ReconcileChatHandler>) -> Self {
        Self {
            mutations,
            reconciler,
        }
    }

    /// 启动观察者，变更通道关闭后退出
    pub async fn run(mut self) {
        tracing::info!("ChatObserver started");

        let report = self.pass();
        tracing::info!(
            scanned = report.scanned,
            controls_bound = report.controls_bound,
            "Initial chat scan completed"
        );

        while let Some(first) = self.mutations.recv().await {
            let mut coalesced = 1;
            while self.mutations.try_recv().is_ok() {
                coalesced += 1;
            }

            tracing::trace!(mutation = ?first, coalesced = coalesced, "Chat mutations received");
            self.pass();
        }

        tracing::info!("ChatObserver stopped");
    }

    fn pass(&self) -> ReconcileReport {
        self.reconciler.handle(ReconcileChat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AugmentationStorePort, ChatSurfacePort};
    use crate::domain::{ChatMessage, MessageId};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::memory::{
        InMemoryAugmentationStore, InMemoryChatSurface, InMemoryControlRegistry,
    };
    use std::time::Duration;

    async fn wait_for<F: Fn() -> bool>(condition: F) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_eager_pass_and_mutation_driven_passes() {
        let (tx, rx) = mpsc::channel(64);
        let surface = Arc::new(InMemoryChatSurface::new(tx));
        let augmentations = Arc::new(InMemoryAugmentationStore::new());
        let reconciler = Arc::new(ReconcileChatHandler::new(
            surface.clone(),
            augmentations.clone(),
            Arc::new(InMemoryControlRegistry::new()),
            Arc::new(EventPublisher::new()),
        ));

        // 观察开始前已存在的内容
        surface.upsert_message(ChatMessage::new("0", "Bob", "“Before”"));

        let observer = tokio::spawn(ChatObserver::new(rx, reconciler).run());

        wait_for(|| augmentations.get(&MessageId::new("0")).is_some()).await;

        surface.upsert_message(ChatMessage::new("1", "Bob", "“Stream").streaming());
        surface.upsert_message(ChatMessage::new("2", "Bob", "plain"));
        wait_for(|| augmentations.get(&MessageId::new("2")).is_some()).await;
        assert!(augmentations.get(&MessageId::new("1")).is_none());

        surface.upsert_message(ChatMessage::new("1", "Bob", "“Streamed”"));
        wait_for(|| augmentations.get(&MessageId::new("1")).is_some()).await;
        let augmented = augmentations.get(&MessageId::new("1")).unwrap();
        assert_eq!(augmented.spans.len(), 1);
        assert_eq!(augmented.spans[0].plain_text, "Streamed");
        assert_eq!(surface.snapshot().messages.len(), 3);

        drop(surface);
        observer.abort();
    }
}
