//! Speech Engine Port - 语音合成后端抽象
//!
//! 定义语音合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioFormat, VoiceId};

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// 语音合成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub model: String,
    /// 要朗读的纯文本
    pub input: String,
    pub voice: VoiceId,
    pub response_format: AudioFormat,
}

/// 语音合成结果
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Speech Engine Port
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// 发送文本和音色到外部语音服务，返回音频数据
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, SpeechError>;
}
