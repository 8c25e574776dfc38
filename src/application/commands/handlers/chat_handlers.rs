//! Chat Command Handlers
//!
//! 调和扫描：把已处理消息集合与当前渲染的消息做差异比对，
//! 只对新增或内容已变化、且已生成完毕的消息提取台词

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::ReconcileChat;
use crate::application::ports::{
    AugmentationStorePort, AugmentedMessage, ChatSurfacePort, ControlBinding, ControlId,
    ControlRegistryPort, UiEvent, UiEventSinkPort,
};
use crate::domain::{embedded_controls, extract_quotes, ChatMessage, MessageId};

/// 一次调和扫描的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// 扫描的消息数
    pub scanned: usize,
    /// 因仍在生成而跳过的消息数
    pub skipped_in_progress: usize,
    /// 本次重新提取的消息数
    pub processed: usize,
    /// 本次新绑定的控件数
    pub controls_bound: usize,
    /// 已不再渲染而被清理的消息数
    pub pruned: usize,
}

/// ReconcileChat Handler
pub struct ReconcileChatHandler {
    surface: Arc<dyn ChatSurfacePort>,
    augmentations: Arc<dyn AugmentationStorePort>,
    controls: Arc<dyn ControlRegistryPort>,
    events: Arc<dyn UiEventSinkPort>,
}

impl ReconcileChatHandler {
    pub fn new(
        surface: Arc<dyn ChatSurfacePort>,
        augmentations: Arc<dyn AugmentationStorePort>,
        controls: Arc<dyn ControlRegistryPort>,
        events: Arc<dyn UiEventSinkPort>,
    ) -> Self {
        Self {
            surface,
            augmentations,
            controls,
            events,
        }
    }

    /// 执行一次调和扫描
    ///
    /// 扫描本身不会失败；单条消息的问题只影响该消息
    pub fn handle(&self, _command: ReconcileChat) -> ReconcileReport {
        let snapshot = self.surface.snapshot();
        let mut report = ReconcileReport::default();

        let rendered: HashSet<&MessageId> = snapshot.messages.iter().map(|m| &m.id).collect();
        for id in self.augmentations.ids() {
            if !rendered.contains(&id) {
                self.forget(&id);
                report.pruned += 1;
            }
        }

        for message in &snapshot.messages {
            report.scanned += 1;

            if message.in_progress {
                report.skipped_in_progress += 1;
                continue;
            }

            if let Some(bound) = self.reconcile_message(message) {
                report.processed += 1;
                report.controls_bound += bound;
            }
        }

        if report.processed > 0 || report.pruned > 0 {
            tracing::debug!(
                scanned = report.scanned,
                skipped_in_progress = report.skipped_in_progress,
                processed = report.processed,
                controls_bound = report.controls_bound,
                pruned = report.pruned,
                "Chat reconciled"
            );
        }

        report
    }

    /// 处理单条消息，返回新绑定的控件数；未处理时返回 None
    fn reconcile_message(&self, message: &ChatMessage) -> Option<usize> {
        let fingerprint = message.fingerprint();
        let previous = self.augmentations.get(&message.id);

        if let Some(previous) = &previous {
            if previous.fingerprint == fingerprint {
                return None;
            }

            // 宿主回传了注入后的标记：内容实质未变，只更新指纹
            if previous.markup.as_deref() == Some(message.content.as_str()) {
                self.augmentations.put(AugmentedMessage {
                    fingerprint,
                    ..previous.clone()
                });
                return None;
            }
        }

        // 内容中仍保留的控件（宿主在注入后的标记上追加内容时）继续有效
        let mut controls: Vec<ControlId> = embedded_controls(&message.content)
            .into_iter()
            .map(|control| {
                let id = ControlId::quote(&message.id, control.index);
                self.controls
                    .bind(id.clone(), ControlBinding::from_embedded(&message.id, control));
                id
            })
            .collect();
        let retained = controls.len();

        let extraction = extract_quotes(&message.content, &message.sender);
        for span in &extraction.spans {
            let id = ControlId::quote(&message.id, span.index);
            self.controls
                .bind(id.clone(), ControlBinding::from_span(&message.id, span));
            controls.push(id);
        }

        if let Some(previous) = &previous {
            for control in previous.controls.iter().filter(|c| !controls.contains(c)) {
                self.controls.unbind(control);
            }
        }

        let bound = controls.len() - retained;
        let markup = extraction.changed().then_some(extraction.markup);

        if bound > 0 {
            tracing::info!(
                message_id = %message.id,
                sender = %message.sender,
                controls = bound,
                "Quote controls injected"
            );
        }

        self.augmentations.put(AugmentedMessage {
            message_id: message.id.clone(),
            fingerprint,
            markup,
            spans: extraction.spans,
            controls,
        });

        if bound > 0 {
            self.events.publish(UiEvent::MessageAugmented {
                message_id: message.id.clone(),
                controls: bound,
            });
        }

        Some(bound)
    }

    fn forget(&self, id: &MessageId) {
        if let Some(previous) = self.augmentations.remove(id) {
            for control in &previous.controls {
                self.controls.unbind(control);
            }
            tracing::debug!(message_id = %id, "Removed message forgotten");
        }
    }
}
