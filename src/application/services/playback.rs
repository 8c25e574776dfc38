//! Playback Controller - 台词播放控制
//!
//! 流程：控件进入加载状态 → 调用语音服务 → 播放临时音频 → 自然结束后恢复空闲
//!
//! 失败（网络、非 2xx、解码/播放）时控件显示错误状态一段固定时间后恢复空闲，
//! 并发出一次提示。同一控件播放期间的再次激活直接忽略，不同控件之间互不限制。

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::VoiceAssignmentStore;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioClip, AudioOutputPort, ControlId, ControlRegistryPort, ControlState, PlaybackError,
    SpeechEnginePort, SpeechError, SpeechRequest, ToastLevel, UiEvent, UiEventSinkPort,
};
use crate::domain::{AudioFormat, VoiceId};

/// 默认试听文本
pub const DEFAULT_PREVIEW_TEXT: &str = "欢迎使用由妮娅开发的敏捷语音生成插件。";

/// 默认错误状态显示时长
pub const DEFAULT_ERROR_DISPLAY_MS: u64 = 2000;

/// 播放配置
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// 语音服务模型名
    pub model: String,
    pub response_format: AudioFormat,
    /// 错误状态显示时长
    pub error_display: Duration,
    /// 试听文本
    pub preview_text: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            model: "tts-1".to_string(),
            response_format: AudioFormat::Mp3,
            error_display: Duration::from_millis(DEFAULT_ERROR_DISPLAY_MS),
            preview_text: DEFAULT_PREVIEW_TEXT.to_string(),
        }
    }
}

/// 播放失败原因
#[derive(Debug, Error)]
pub enum PlaybackFailure {
    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Output(#[from] PlaybackError),
}

/// 播放结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    /// 播放自然结束
    Completed { duration_ms: u64 },
    /// 控件正忙，本次激活被忽略
    Busy,
    /// 文本为空，不发起请求
    EmptyText,
    /// 播放失败，控件已恢复空闲
    Failed { error: String },
}

/// 激活结果：已开始，或被拒绝（控件正忙、文本为空）
#[derive(Debug)]
pub enum Activation {
    Started(StartedPlayback),
    Rejected(PlaybackOutcome),
}

/// 已进入加载状态、尚未请求语音服务的播放
#[derive(Debug)]
pub struct StartedPlayback {
    control: ControlId,
    text: String,
    voice: VoiceId,
    kind: PlaybackKind,
}

impl StartedPlayback {
    pub fn control_id(&self) -> &ControlId {
        &self.control
    }
}

#[derive(Debug, Clone, Copy)]
enum PlaybackKind {
    Quote,
    Preview,
}

impl PlaybackKind {
    fn failure_toast(&self, error: &PlaybackFailure) -> String {
        match self {
            Self::Quote => format!("语音播放失败: {}", error),
            Self::Preview => "试听播放失败".to_string(),
        }
    }
}

pub struct PlaybackController {
    config: PlaybackConfig,
    speech_engine: Arc<dyn SpeechEnginePort>,
    audio_output: Arc<dyn AudioOutputPort>,
    controls: Arc<dyn ControlRegistryPort>,
    events: Arc<dyn UiEventSinkPort>,
    voices: Arc<VoiceAssignmentStore>,
}

impl PlaybackController {
    pub fn new(
        config: PlaybackConfig,
        speech_engine: Arc<dyn SpeechEnginePort>,
        audio_output: Arc<dyn AudioOutputPort>,
        controls: Arc<dyn ControlRegistryPort>,
        events: Arc<dyn UiEventSinkPort>,
        voices: Arc<VoiceAssignmentStore>,
    ) -> Self {
        Self {
            config,
            speech_engine,
            audio_output,
            controls,
            events,
            voices,
        }
    }

    /// 用指定音色朗读文本
    pub async fn play(&self, control: &ControlId, text: &str, voice: &VoiceId) -> PlaybackOutcome {
        match self.begin(control, text, voice, PlaybackKind::Quote) {
            Activation::Started(started) => self.finish(started).await,
            Activation::Rejected(outcome) => outcome,
        }
    }

    /// 激活台词控件：通过控件绑定解析台词和说话人音色
    pub async fn activate(&self, control: &ControlId) -> Result<PlaybackOutcome, ApplicationError> {
        Ok(match self.start_activation(control)? {
            Activation::Started(started) => self.finish(started).await,
            Activation::Rejected(outcome) => outcome,
        })
    }

    /// 激活的同步部分：解析绑定并原子地进入加载状态
    ///
    /// 返回 `Started` 时控件已处于加载状态，调用方必须随后执行 [`Self::finish`]
    pub fn start_activation(&self, control: &ControlId) -> Result<Activation, ApplicationError> {
        let binding = self
            .controls
            .binding(control)
            .ok_or_else(|| ApplicationError::not_found("Control", control.as_str()))?;
        let voice = self.voices.get_voice(&binding.speaker);

        tracing::debug!(
            control_id = %control,
            speaker = %binding.speaker,
            voice = %voice,
            "Control activated"
        );

        Ok(self.begin(control, &binding.text, &voice, PlaybackKind::Quote))
    }

    /// 用当前选择（未必已保存）的音色播放试听文本
    pub async fn preview(&self, participant: &str, voice: &VoiceId) -> PlaybackOutcome {
        let control = ControlId::preview(participant);
        let text = self.config.preview_text.clone();
        match self.begin(&control, &text, voice, PlaybackKind::Preview) {
            Activation::Started(started) => self.finish(started).await,
            Activation::Rejected(outcome) => outcome,
        }
    }

    /// 控件是否正忙
    pub fn is_busy(&self, control: &ControlId) -> bool {
        self.controls.state(control) != ControlState::Idle
    }

    /// 控件当前状态
    pub fn state(&self, control: &ControlId) -> ControlState {
        self.controls.state(control)
    }

    fn begin(
        &self,
        control: &ControlId,
        text: &str,
        voice: &VoiceId,
        kind: PlaybackKind,
    ) -> Activation {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(control_id = %control, "Empty text, playback skipped");
            return Activation::Rejected(PlaybackOutcome::EmptyText);
        }

        if !self.controls.try_begin(control) {
            tracing::debug!(control_id = %control, "Control busy, activation ignored");
            return Activation::Rejected(PlaybackOutcome::Busy);
        }
        self.events
            .publish(UiEvent::control_state(control, ControlState::Loading));

        Activation::Started(StartedPlayback {
            control: control.clone(),
            text: text.to_string(),
            voice: voice.clone(),
            kind,
        })
    }

    /// 执行已进入加载状态的播放，直到自然结束或失败恢复
    pub async fn finish(&self, started: StartedPlayback) -> PlaybackOutcome {
        let StartedPlayback {
            control,
            text,
            voice,
            kind,
        } = started;

        match self.speak(&control, &text, &voice).await {
            Ok(duration_ms) => {
                self.set_state(&control, ControlState::Idle);
                tracing::info!(
                    control_id = %control,
                    voice = %voice,
                    duration_ms = duration_ms,
                    "Playback completed"
                );
                PlaybackOutcome::Completed { duration_ms }
            }
            Err(error) => {
                self.fail(&control, kind, &error).await;
                PlaybackOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    async fn speak(
        &self,
        control: &ControlId,
        text: &str,
        voice: &VoiceId,
    ) -> Result<u64, PlaybackFailure> {
        let request = SpeechRequest {
            model: self.config.model.clone(),
            input: text.to_string(),
            voice: voice.clone(),
            response_format: self.config.response_format,
        };

        let audio = self.speech_engine.synthesize(request).await?;
        let clip = AudioClip {
            control_id: control.clone(),
            data: audio.data,
            format: audio.format,
        };

        Ok(self.audio_output.play(clip).await?)
    }

    async fn fail(&self, control: &ControlId, kind: PlaybackKind, error: &PlaybackFailure) {
        tracing::error!(control_id = %control, error = %error, "Playback failed");

        self.set_state(control, ControlState::Error);
        self.events
            .publish(UiEvent::toast(ToastLevel::Error, kind.failure_toast(error)));

        tokio::time::sleep(self.config.error_display).await;
        self.set_state(control, ControlState::Idle);
    }

    fn set_state(&self, control: &ControlId, state: ControlState) {
        self.controls.set_state(control, state);
        self.events.publish(UiEvent::control_state(control, state));
    }
}
