//! Participant Command Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::commands::{ActivateControl, AssignVoice, FillDefaultVoices, PreviewVoice};
use crate::application::error::ApplicationError;
use crate::application::ports::{ChatSurfacePort, ControlId, ControlRegistryPort, ControlState};
use crate::application::services::{
    Activation, PlaybackController, PlaybackOutcome, StartedPlayback, VoiceAssignmentStore,
};
use crate::domain::{scan_participants, ParticipantName, VoiceId};

// ============================================================================
// AssignVoice
// ============================================================================

/// 音色分配响应
#[derive(Debug, Clone, Serialize)]
pub struct AssignVoiceResponse {
    pub participant: String,
    pub voice: VoiceId,
}

/// AssignVoice Handler
pub struct AssignVoiceHandler {
    voices: Arc<VoiceAssignmentStore>,
}

impl AssignVoiceHandler {
    pub fn new(voices: Arc<VoiceAssignmentStore>) -> Self {
        Self { voices }
    }

    pub fn handle(&self, command: AssignVoice) -> Result<AssignVoiceResponse, ApplicationError> {
        let voice = self.voices.set_voice(&command.participant, &command.voice)?;
        Ok(AssignVoiceResponse {
            participant: command.participant.trim().to_string(),
            voice,
        })
    }
}

// ============================================================================
// FillDefaultVoices
// ============================================================================

/// FillDefaultVoices Handler
pub struct FillDefaultVoicesHandler {
    surface: Arc<dyn ChatSurfacePort>,
    voices: Arc<VoiceAssignmentStore>,
}

impl FillDefaultVoicesHandler {
    pub fn new(surface: Arc<dyn ChatSurfacePort>, voices: Arc<VoiceAssignmentStore>) -> Self {
        Self { surface, voices }
    }

    /// 返回新写入的分配数量
    pub fn handle(&self, _command: FillDefaultVoices) -> usize {
        let participants = scan_participants(&self.surface.snapshot());
        self.voices.fill_defaults(&participants)
    }
}

// ============================================================================
// PreviewVoice
// ============================================================================

/// PreviewVoice Handler
pub struct PreviewVoiceHandler {
    voices: Arc<VoiceAssignmentStore>,
    playback: Arc<PlaybackController>,
}

impl PreviewVoiceHandler {
    pub fn new(voices: Arc<VoiceAssignmentStore>, playback: Arc<PlaybackController>) -> Self {
        Self { voices, playback }
    }

    pub async fn handle(&self, command: PreviewVoice) -> Result<PlaybackOutcome, ApplicationError> {
        let participant =
            ParticipantName::new(&command.participant).map_err(ApplicationError::validation)?;
        let voice = self.voices.catalog().require(&command.voice)?;

        tracing::debug!(participant = %participant, voice = %voice, "Voice preview requested");

        Ok(self.playback.preview(participant.as_str(), &voice).await)
    }
}

// ============================================================================
// ActivateControl
// ============================================================================

/// ActivateControl Handler
pub struct ActivateControlHandler {
    controls: Arc<dyn ControlRegistryPort>,
    playback: Arc<PlaybackController>,
}

impl ActivateControlHandler {
    pub fn new(controls: Arc<dyn ControlRegistryPort>, playback: Arc<PlaybackController>) -> Self {
        Self { controls, playback }
    }

    /// 解析控件并原子地进入加载状态
    ///
    /// 控件未绑定时返回 NotFound；控件正忙时返回 `Activation::Rejected`
    pub fn start(&self, command: &ActivateControl) -> Result<Activation, ApplicationError> {
        self.playback.start_activation(&command.control_id)
    }

    /// 控件当前状态
    pub fn state(&self, control_id: &ControlId) -> ControlState {
        self.controls.state(control_id)
    }

    /// 播放直到自然结束或失败恢复
    pub async fn complete(&self, started: StartedPlayback) -> PlaybackOutcome {
        self.playback.finish(started).await
    }
}
