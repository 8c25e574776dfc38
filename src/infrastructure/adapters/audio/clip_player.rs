//! Clip Player - 基于 symphonia 的临时音频播放
//!
//! 流程：
//! 1. 解码整段音频，得到时长（无法解码即播放失败）
//! 2. 存入 ClipStore 并推送 ClipReady，前端据此取回并播放
//! 3. 等待音频时长（自然结束）
//! 4. 撤销临时音频并推送 ClipReleased

use async_trait::async_trait;
use chrono::Utc;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use uuid::Uuid;

use super::{ClipStore, StoredClip};
use crate::application::ports::{
    AudioClip, AudioOutputPort, ControlId, PlaybackError, UiEvent, UiEventSinkPort,
};
use crate::domain::AudioFormat;

/// 临时音频的访问路径前缀
pub const CLIP_ROUTE_PREFIX: &str = "/api/audio";

/// 播放器配置
#[derive(Debug, Clone)]
pub struct ClipPlayerConfig {
    /// 临时音频 URL 前缀
    pub route_prefix: String,
    /// 解码后额外等待的时长，覆盖前端的加载延迟
    pub tail: Duration,
}

impl Default for ClipPlayerConfig {
    fn default() -> Self {
        Self {
            route_prefix: CLIP_ROUTE_PREFIX.to_string(),
            tail: Duration::from_millis(250),
        }
    }
}

/// 临时音频播放器
pub struct ClipPlayer {
    config: ClipPlayerConfig,
    store: Arc<ClipStore>,
    events: Arc<dyn UiEventSinkPort>,
}

impl ClipPlayer {
    pub fn new(
        config: ClipPlayerConfig,
        store: Arc<ClipStore>,
        events: Arc<dyn UiEventSinkPort>,
    ) -> Self {
        Self {
            config,
            store,
            events,
        }
    }

    fn clip_url(&self, clip_id: &Uuid) -> String {
        format!("{}/{}", self.config.route_prefix, clip_id)
    }
}

/// 播放期间持有临时音频，离开作用域时撤销
struct ClipLease<'a> {
    store: &'a ClipStore,
    events: &'a dyn UiEventSinkPort,
    control_id: ControlId,
    clip_id: Uuid,
}

impl Drop for ClipLease<'_> {
    fn drop(&mut self) {
        if self.store.revoke(&self.clip_id) {
            tracing::debug!(control_id = %self.control_id, clip_id = %self.clip_id, "Clip released");
            self.events.publish(UiEvent::ClipReleased {
                control_id: self.control_id.clone(),
                clip_id: self.clip_id,
            });
        }
    }
}

#[async_trait]
impl AudioOutputPort for ClipPlayer {
    async fn play(&self, clip: AudioClip) -> Result<u64, PlaybackError> {
        let data = Arc::new(clip.data);
        let format = clip.format;

        let decode_input = data.clone();
        let duration_ms = tokio::task::spawn_blocking(move || measure_duration(&decode_input, format))
            .await
            .map_err(|e| PlaybackError::Output(format!("Decode task failed: {}", e)))??;

        let clip_id = self.store.insert(StoredClip {
            control_id: clip.control_id.clone(),
            data,
            format,
            duration_ms,
            created_at: Utc::now(),
        });
        let _lease = ClipLease {
            store: &self.store,
            events: self.events.as_ref(),
            control_id: clip.control_id.clone(),
            clip_id,
        };

        tracing::debug!(
            control_id = %clip.control_id,
            clip_id = %clip_id,
            duration_ms = duration_ms,
            "Clip ready"
        );
        self.events.publish(UiEvent::ClipReady {
            control_id: clip.control_id,
            clip_id,
            url: self.clip_url(&clip_id),
            duration_ms,
        });

        tokio::time::sleep(Duration::from_millis(duration_ms) + self.config.tail).await;

        Ok(duration_ms)
    }
}

/// 解码整段音频并返回时长（毫秒）
pub fn measure_duration(data: &[u8], format: AudioFormat) -> Result<u64, PlaybackError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());
    hint.mime_type(format.mime_type());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("Probe failed: {}", e)))?;

    let mut reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| PlaybackError::Decode("No audio track found".to_string()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("Decoder creation failed: {}", e)))?;

    let mut frames: u64 = 0;
    let mut sample_rate = track.codec_params.sample_rate;

    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(PlaybackError::Decode(format!("Packet read error: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                frames += decoded.frames() as u64;
                sample_rate = sample_rate.or(Some(decoded.spec().rate));
            }
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Decode error (skipping packet)");
            }
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        }
    }

    let sample_rate = sample_rate
        .filter(|rate| *rate > 0)
        .ok_or_else(|| PlaybackError::Decode("Unknown sample rate".to_string()))?;

    if frames == 0 {
        return Err(PlaybackError::Decode("No audio frames decoded".to_string()));
    }

    Ok(frames * 1000 / sample_rate as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::speech::silent_wav;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Events(Mutex<Vec<UiEvent>>);

    impl UiEventSinkPort for Events {
        fn publish(&self, event: UiEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_measure_wav_duration() {
        let wav = silent_wav(1000, 8000);
        assert_eq!(measure_duration(&wav, AudioFormat::Wav).unwrap(), 1000);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let result = measure_duration(b"definitely not audio", AudioFormat::Mp3);
        assert!(matches!(result, Err(PlaybackError::Decode(_))));
    }

    #[tokio::test]
    async fn test_clip_is_released_after_playback() {
        let store = Arc::new(ClipStore::new());
        let events = Arc::new(Events::default());
        let player = ClipPlayer::new(
            ClipPlayerConfig {
                tail: Duration::ZERO,
                ..Default::default()
            },
            store.clone(),
            events.clone(),
        );

        let duration = player
            .play(AudioClip {
                control_id: ControlId::new("c1"),
                data: silent_wav(100, 8000),
                format: AudioFormat::Wav,
            })
            .await
            .unwrap();

        assert_eq!(duration, 100);
        assert!(store.is_empty());

        let events = events.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        let UiEvent::ClipReady { url, clip_id, .. } = &events[0] else {
            panic!("expected ClipReady, got {:?}", events[0]);
        };
        assert_eq!(url, &format!("/api/audio/{}", clip_id));
        assert!(matches!(
            &events[1],
            UiEvent::ClipReleased { clip_id: released, .. } if released == clip_id
        ));
    }

    #[tokio::test]
    async fn test_undecodable_clip_is_never_published() {
        let store = Arc::new(ClipStore::new());
        let events = Arc::new(Events::default());
        let player = ClipPlayer::new(ClipPlayerConfig::default(), store.clone(), events.clone());

        let result = player
            .play(AudioClip {
                control_id: ControlId::new("c1"),
                data: vec![0u8; 64],
                format: AudioFormat::Mp3,
            })
            .await;

        assert!(result.is_err());
        assert!(store.is_empty());
        assert!(events.0.lock().unwrap().is_empty());
    }
}
