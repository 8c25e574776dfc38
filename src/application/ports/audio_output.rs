//! Audio Output Port - 音频播放抽象

use async_trait::async_trait;
use thiserror::Error;

use super::ControlId;
use crate::domain::AudioFormat;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Output error: {0}")]
    Output(String),
}

/// 待播放的临时音频
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// 触发播放的控件
    pub control_id: ControlId,
    pub data: Vec<u8>,
    pub format: AudioFormat,
}

/// Audio Output Port
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// 播放音频，自然结束后返回播放时长（毫秒）
    ///
    /// 临时音频资源在返回前释放
    async fn play(&self, clip: AudioClip) -> Result<u64, PlaybackError>;
}
