//! Voice Assignment Store - 参与者音色分配
//!
//! 读取时校验音色仍在目录中，未分配或已下线的音色回退到目录第一项

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SettingsServicePort;
use crate::domain::{ParticipantName, VoiceCatalog, VoiceId};

pub struct VoiceAssignmentStore {
    catalog: Arc<VoiceCatalog>,
    settings: Arc<dyn SettingsServicePort>,
}

impl VoiceAssignmentStore {
    pub fn new(catalog: Arc<VoiceCatalog>, settings: Arc<dyn SettingsServicePort>) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// 获取参与者音色
    pub fn get_voice(&self, name: &str) -> VoiceId {
        let stored = self.settings.voice_for(name.trim());
        if let Some(voice) = stored.as_deref() {
            if !self.catalog.contains(voice) {
                tracing::warn!(
                    participant = %name.trim(),
                    voice = %voice,
                    fallback = %self.catalog.fallback(),
                    "Stored voice not in catalog, using fallback"
                );
            }
        }
        self.catalog.resolve(stored.as_deref())
    }

    /// 是否已有保存的分配
    pub fn is_assigned(&self, name: &str) -> bool {
        self.settings.voice_for(name.trim()).is_some()
    }

    /// 设置参与者音色并安排保存
    pub fn set_voice(&self, name: &str, voice: &str) -> Result<VoiceId, ApplicationError> {
        let participant = ParticipantName::new(name).map_err(ApplicationError::validation)?;
        let voice = self.catalog.require(voice)?;

        self.settings.assign(participant.as_str(), voice.as_str());

        tracing::info!(
            participant = %participant,
            voice = %voice,
            "Voice assigned"
        );
        Ok(voice)
    }

    /// 为尚未分配的参与者写入兜底音色，返回写入数量
    pub fn fill_defaults(&self, participants: &[ParticipantName]) -> usize {
        let fallback = self.catalog.fallback();
        let mut filled = 0;
        for participant in participants {
            if !self.is_assigned(participant.as_str()) {
                self.settings.assign(participant.as_str(), fallback.as_str());
                filled += 1;
            }
        }
        if filled > 0 {
            tracing::debug!(filled = filled, voice = %fallback, "Default voices filled");
        }
        filled
    }
}
