//! In-Memory Augmentation Store Implementation

use dashmap::DashMap;

use crate::application::ports::{AugmentationStorePort, AugmentedMessage};
use crate::domain::MessageId;

/// 内存中的已处理消息集合
#[derive(Default)]
pub struct InMemoryAugmentationStore {
    messages: DashMap<MessageId, AugmentedMessage>,
}

impl InMemoryAugmentationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AugmentationStorePort for InMemoryAugmentationStore {
    fn get(&self, id: &MessageId) -> Option<AugmentedMessage> {
        self.messages.get(id).map(|m| m.clone())
    }

    fn fingerprint(&self, id: &MessageId) -> Option<String> {
        self.messages.get(id).map(|m| m.fingerprint.clone())
    }

    fn put(&self, message: AugmentedMessage) {
        self.messages.insert(message.message_id.clone(), message);
    }

    fn remove(&self, id: &MessageId) -> Option<AugmentedMessage> {
        self.messages.remove(id).map(|(_, message)| message)
    }

    fn ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|entry| entry.key().clone()).collect()
    }
}
