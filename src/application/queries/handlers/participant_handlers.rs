//! Participant Query Handlers
//!
//! 设置面板刷新：重新识别参与者并解析每个参与者当前的音色

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChatSurfacePort, ToastLevel, UiEvent, UiEventSinkPort};
use crate::application::queries::{GetParticipantVoice, ScanParticipants};
use crate::application::services::VoiceAssignmentStore;
use crate::domain::{scan_participants, ParticipantName, VoiceId};

/// 未识别到任何参与者时显示的文本
pub const EMPTY_PARTICIPANTS_MESSAGE: &str = "未检测到角色，请先加载对话。";

// ============================================================================
// Response DTOs
// ============================================================================

/// 参与者行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    pub name: String,
    pub voice: VoiceId,
    /// 是否已有保存的分配
    pub assigned: bool,
}

/// 参与者列表响应
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantsView {
    pub rows: Vec<ParticipantRow>,
    /// 空状态文本；有参与者时为 None
    pub empty_message: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// ScanParticipants Handler
pub struct ScanParticipantsHandler {
    surface: Arc<dyn ChatSurfacePort>,
    voices: Arc<VoiceAssignmentStore>,
    events: Arc<dyn UiEventSinkPort>,
}

impl ScanParticipantsHandler {
    pub fn new(
        surface: Arc<dyn ChatSurfacePort>,
        voices: Arc<VoiceAssignmentStore>,
        events: Arc<dyn UiEventSinkPort>,
    ) -> Self {
        Self {
            surface,
            voices,
            events,
        }
    }

    pub fn handle(&self, _query: ScanParticipants) -> ParticipantsView {
        let participants = scan_participants(&self.surface.snapshot());

        if participants.is_empty() {
            return ParticipantsView {
                rows: Vec::new(),
                empty_message: Some(EMPTY_PARTICIPANTS_MESSAGE.to_string()),
            };
        }

        let rows: Vec<ParticipantRow> = participants
            .into_iter()
            .map(|name| ParticipantRow {
                voice: self.voices.get_voice(name.as_str()),
                assigned: self.voices.is_assigned(name.as_str()),
                name: name.into_string(),
            })
            .collect();

        self.events.publish(UiEvent::toast(
            ToastLevel::Success,
            format!("已加载 {} 名角色", rows.len()),
        ));

        ParticipantsView {
            rows,
            empty_message: None,
        }
    }
}

/// GetParticipantVoice Handler
pub struct GetParticipantVoiceHandler {
    voices: Arc<VoiceAssignmentStore>,
}

impl GetParticipantVoiceHandler {
    pub fn new(voices: Arc<VoiceAssignmentStore>) -> Self {
        Self { voices }
    }

    pub fn handle(&self, query: GetParticipantVoice) -> Result<ParticipantRow, ApplicationError> {
        let name =
            ParticipantName::new(&query.participant).map_err(ApplicationError::validation)?;
        Ok(ParticipantRow {
            voice: self.voices.get_voice(name.as_str()),
            assigned: self.voices.is_assigned(name.as_str()),
            name: name.into_string(),
        })
    }
}
