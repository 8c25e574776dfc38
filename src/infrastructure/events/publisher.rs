//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现：所有界面事件通过一个全局广播通道分发

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{UiEvent, UiEventSinkPort};

/// 广播通道容量
const CHANNEL_CAPACITY: usize = 256;

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<UiEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅界面事件
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.channel.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.channel.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiEventSinkPort for EventPublisher {
    fn publish(&self, event: UiEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}
