//! Chat Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AugmentationStorePort, ChatSurfacePort, ControlId, ControlRegistryPort, ControlState,
};
use crate::application::queries::GetMessage;
use crate::domain::MessageId;

// ============================================================================
// Response DTOs
// ============================================================================

/// 控件视图
#[derive(Debug, Clone, Serialize)]
pub struct ControlView {
    pub control_id: ControlId,
    pub index: usize,
    pub speaker: String,
    pub text: String,
    pub state: ControlState,
    pub icon: &'static str,
}

/// 消息视图
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message_id: MessageId,
    pub sender: String,
    pub in_progress: bool,
    /// 是否已完成提取
    pub processed: bool,
    /// 注入控件后的标记；无需改写时为原始内容
    pub markup: String,
    pub controls: Vec<ControlView>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetMessage Handler
pub struct GetMessageHandler {
    surface: Arc<dyn ChatSurfacePort>,
    augmentations: Arc<dyn AugmentationStorePort>,
    controls: Arc<dyn ControlRegistryPort>,
}

impl GetMessageHandler {
    pub fn new(
        surface: Arc<dyn ChatSurfacePort>,
        augmentations: Arc<dyn AugmentationStorePort>,
        controls: Arc<dyn ControlRegistryPort>,
    ) -> Self {
        Self {
            surface,
            augmentations,
            controls,
        }
    }

    pub fn handle(&self, query: GetMessage) -> Result<MessageView, ApplicationError> {
        let message = self
            .surface
            .snapshot()
            .messages
            .into_iter()
            .find(|m| m.id == query.message_id)
            .ok_or_else(|| ApplicationError::not_found("Message", query.message_id.as_str()))?;

        // 只有指纹与当前内容一致的记录才有效
        let augmented = self
            .augmentations
            .get(&message.id)
            .filter(|a| a.fingerprint == message.fingerprint());

        let Some(augmented) = augmented else {
            return Ok(MessageView {
                message_id: message.id,
                sender: message.sender,
                in_progress: message.in_progress,
                processed: false,
                markup: message.content,
                controls: Vec::new(),
            });
        };

        let controls = augmented
            .controls
            .iter()
            .filter_map(|id| {
                let binding = self.controls.binding(id)?;
                let state = self.controls.state(id);
                Some(ControlView {
                    control_id: id.clone(),
                    index: binding.index,
                    speaker: binding.speaker,
                    text: binding.text,
                    state,
                    icon: state.icon(),
                })
            })
            .collect();

        Ok(MessageView {
            message_id: message.id,
            sender: message.sender,
            in_progress: message.in_progress,
            processed: true,
            markup: augmented.markup.unwrap_or(message.content),
            controls,
        })
    }
}
