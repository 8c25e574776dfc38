//! Fake Speech Client - 用于测试和离线运行的语音客户端
//!
//! 不调用外部服务，返回指定时长的静音 WAV，或按配置返回固定的服务端错误

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::application::ports::{SpeechAudio, SpeechEnginePort, SpeechError, SpeechRequest};
use crate::domain::AudioFormat;

/// Fake Speech Client 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechClientConfig {
    /// 返回音频的时长（毫秒）
    pub duration_ms: u64,
    pub sample_rate: u32,
    /// 模拟的合成延迟
    pub latency: Duration,
    /// 设置后每次请求都返回该 HTTP 状态的服务错误
    pub fail_status: Option<u16>,
}

impl Default for FakeSpeechClientConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            sample_rate: 8000,
            latency: Duration::from_millis(50),
            fail_status: None,
        }
    }
}

/// Fake Speech Client
pub struct FakeSpeechClient {
    config: FakeSpeechClientConfig,
    calls: AtomicUsize,
}

impl FakeSpeechClient {
    pub fn new(config: FakeSpeechClientConfig) -> Self {
        tracing::info!(
            duration_ms = config.duration_ms,
            fail_status = ?config.fail_status,
            "FakeSpeechClient initialized"
        );
        Self {
            config,
            calls: AtomicUsize::new(0),
        }
    }

    /// 已收到的请求数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechEnginePort for FakeSpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(
            text_len = request.input.len(),
            voice = %request.voice,
            "FakeSpeechClient: returning generated audio"
        );

        tokio::time::sleep(self.config.latency).await;

        if let Some(status) = self.config.fail_status {
            return Err(SpeechError::ServiceError {
                status,
                message: "fake failure".to_string(),
            });
        }

        Ok(SpeechAudio {
            data: silent_wav(self.config.duration_ms, self.config.sample_rate),
            format: AudioFormat::Wav,
        })
    }
}

/// 生成 16 位单声道静音 WAV
pub fn silent_wav(duration_ms: u64, sample_rate: u32) -> Vec<u8> {
    let samples = (sample_rate as u64 * duration_ms / 1000) as u32;
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}
