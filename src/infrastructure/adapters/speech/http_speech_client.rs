//! HTTP Speech Client - 调用外部语音合成服务
//!
//! 实现 SpeechEnginePort trait，支持两种传输方式：
//!
//! 直连:
//! POST {url}
//! Authorization: Bearer {api_key}
//! Request: {"model": "...", "input": "...", "voice": "...", "response_format": "mp3"}
//! Response: audio/mpeg binary
//!
//! 同源代理:
//! POST {proxy_url}
//! Request: {"endpoint": "{url}", "auth_header": "...", "credential": "...", "model": ..., ...}
//! 代理把请求体转发到 endpoint，并附加 `auth_header: credential`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{SpeechAudio, SpeechEnginePort, SpeechError, SpeechRequest};
use crate::domain::AudioFormat;

/// 语音合成请求体 (JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechBody {
    pub model: String,
    pub input: String,
    pub voice: String,
    pub response_format: AudioFormat,
}

impl From<&SpeechRequest> for SpeechBody {
    fn from(request: &SpeechRequest) -> Self {
        Self {
            model: request.model.clone(),
            input: request.input.clone(),
            voice: request.voice.as_str().to_string(),
            response_format: request.response_format,
        }
    }
}

/// 发往同源代理的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySpeechPayload {
    /// 真实的语音服务地址
    pub endpoint: String,
    /// 认证头名称
    pub auth_header: String,
    /// 认证头的值
    pub credential: String,
    #[serde(flatten)]
    pub body: SpeechBody,
}

/// 传输方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechTransport {
    /// 直接携带 Bearer 凭据请求语音服务
    Direct { url: String, api_key: String },
    /// 通过同源代理转发
    Proxy {
        proxy_url: String,
        target_url: String,
        auth_header: String,
        credential: String,
    },
}

impl SpeechTransport {
    fn name(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "direct",
            Self::Proxy { .. } => "proxy",
        }
    }

    fn url(&self) -> &str {
        match self {
            Self::Direct { url, .. } => url,
            Self::Proxy { proxy_url, .. } => proxy_url,
        }
    }
}

/// HTTP 语音客户端配置
#[derive(Debug, Clone)]
pub struct HttpSpeechClientConfig {
    pub transport: SpeechTransport,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 连接失败或超时的重试次数
    pub max_retries: u32,
}

impl Default for HttpSpeechClientConfig {
    fn default() -> Self {
        Self {
            transport: SpeechTransport::Direct {
                url: "http://localhost:8000/v1/audio/speech".to_string(),
                api_key: String::new(),
            },
            timeout_secs: 60,
            max_retries: 1,
        }
    }
}

impl HttpSpeechClientConfig {
    pub fn new(transport: SpeechTransport) -> Self {
        Self {
            transport,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// HTTP 语音客户端
pub struct HttpSpeechClient {
    client: Client,
    config: HttpSpeechClientConfig,
}

impl HttpSpeechClient {
    pub fn new(config: HttpSpeechClientConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn build_request(&self, body: SpeechBody) -> RequestBuilder {
        match &self.config.transport {
            SpeechTransport::Direct { url, api_key } => {
                self.client.post(url).bearer_auth(api_key).json(&body)
            }
            SpeechTransport::Proxy {
                proxy_url,
                target_url,
                auth_header,
                credential,
            } => self.client.post(proxy_url).json(&ProxySpeechPayload {
                endpoint: target_url.clone(),
                auth_header: auth_header.clone(),
                credential: credential.clone(),
                body,
            }),
        }
    }

    async fn send_once(&self, body: SpeechBody) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .build_request(body)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SpeechError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        if audio.is_empty() {
            return Err(SpeechError::InvalidResponse("Empty audio body".to_string()));
        }
        Ok(audio.to_vec())
    }
}

fn map_send_error(e: reqwest::Error) -> SpeechError {
    if e.is_timeout() {
        SpeechError::Timeout
    } else if e.is_connect() {
        SpeechError::NetworkError(format!("Cannot connect to speech service: {}", e))
    } else {
        SpeechError::NetworkError(e.to_string())
    }
}

/// 仅连接失败和超时可重试；服务端已给出响应的错误不重试
fn is_retryable(error: &SpeechError) -> bool {
    matches!(error, SpeechError::Timeout | SpeechError::NetworkError(_))
}

#[async_trait]
impl SpeechEnginePort for HttpSpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechAudio, SpeechError> {
        let body = SpeechBody::from(&request);

        tracing::debug!(
            transport = self.config.transport.name(),
            url = %self.config.transport.url(),
            voice = %request.voice,
            text_len = request.input.len(),
            "Sending speech request"
        );

        let mut attempt = 0;
        let data = loop {
            match self.send_once(body.clone()).await {
                Ok(data) => break data,
                Err(e) if is_retryable(&e) && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt = attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "Speech request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(200 * attempt as u64)).await;
                }
                Err(e) => return Err(e),
            }
        };

        tracing::info!(
            voice = %request.voice,
            audio_size = data.len(),
            "Speech synthesis completed"
        );

        Ok(SpeechAudio {
            data,
            format: request.response_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::upstream_stub::{UpstreamStub, STUB_AUDIO};
    use super::*;
    use crate::domain::VoiceId;
    use axum::http::StatusCode;

    fn hello() -> SpeechRequest {
        SpeechRequest {
            model: "tts-1".to_string(),
            input: "Hello".to_string(),
            voice: VoiceId::new("nova").unwrap(),
            response_format: AudioFormat::Mp3,
        }
    }

    fn client(transport: SpeechTransport, max_retries: u32) -> HttpSpeechClient {
        HttpSpeechClient::new(
            HttpSpeechClientConfig::new(transport)
                .with_timeout(5)
                .with_retries(max_retries),
        )
        .unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = HttpSpeechClientConfig::new(SpeechTransport::Direct {
            url: "http://example.com/v1/audio/speech".to_string(),
            api_key: "k".to_string(),
        })
        .with_timeout(30)
        .with_retries(3);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.transport.name(), "direct");
    }

    #[test]
    fn test_body_wire_shape() {
        let request = SpeechRequest {
            model: "tts-1".to_string(),
            input: "Hello".to_string(),
            voice: VoiceId::new("zh-CN-XiaoxiaoNeural").unwrap(),
            response_format: AudioFormat::Mp3,
        };
        let json = serde_json::to_value(SpeechBody::from(&request)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "tts-1",
                "input": "Hello",
                "voice": "zh-CN-XiaoxiaoNeural",
                "response_format": "mp3"
            })
        );
    }

    #[test]
    fn test_proxy_payload_is_flat() {
        let payload = ProxySpeechPayload {
            endpoint: "https://tts.example.com/v1/audio/speech".to_string(),
            auth_header: "Authorization".to_string(),
            credential: "Bearer secret".to_string(),
            body: SpeechBody {
                model: "tts-1".to_string(),
                input: "Hi".to_string(),
                voice: "v".to_string(),
                response_format: AudioFormat::Mp3,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["endpoint"], "https://tts.example.com/v1/audio/speech");
        assert_eq!(json["input"], "Hi");
        assert_eq!(json["response_format"], "mp3");

        let back: ProxySpeechPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_only_transport_failures_retry() {
        assert!(is_retryable(&SpeechError::Timeout));
        assert!(is_retryable(&SpeechError::NetworkError("x".to_string())));
        assert!(!is_retryable(&SpeechError::ServiceError {
            status: 500,
            message: String::new()
        }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = HttpSpeechClientConfig::new(SpeechTransport::Direct {
            url: "http://127.0.0.1:1/v1/audio/speech".to_string(),
            api_key: String::new(),
        })
        .with_timeout(2)
        .with_retries(0);
        let client = HttpSpeechClient::new(config).unwrap();

        let result = client
            .synthesize(SpeechRequest {
                model: "tts-1".to_string(),
                input: "Hi".to_string(),
                voice: VoiceId::new("v").unwrap(),
                response_format: AudioFormat::Mp3,
            })
            .await;
        assert!(matches!(
            result,
            Err(SpeechError::NetworkError(_)) | Err(SpeechError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_direct_sends_bearer_and_body() {
        let upstream = UpstreamStub::spawn(StatusCode::OK).await;
        let client = client(
            SpeechTransport::Direct {
                url: upstream.url.clone(),
                api_key: "sk-test".to_string(),
            },
            0,
        );

        let audio = client.synthesize(hello()).await.unwrap();
        assert_eq!(audio.data, STUB_AUDIO);
        assert_eq!(audio.format, AudioFormat::Mp3);

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        let (headers, body) = &requests[0];
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(
            body,
            &serde_json::json!({
                "model": "tts-1",
                "input": "Hello",
                "voice": "nova",
                "response_format": "mp3"
            })
        );
    }

    #[tokio::test]
    async fn test_proxy_posts_flat_payload_to_proxy_url() {
        let upstream = UpstreamStub::spawn(StatusCode::OK).await;
        let client = client(
            SpeechTransport::Proxy {
                proxy_url: upstream.url.clone(),
                target_url: "https://tts.example.com/v1/audio/speech".to_string(),
                auth_header: "X-Api-Key".to_string(),
                credential: "secret".to_string(),
            },
            0,
        );

        client.synthesize(hello()).await.unwrap();

        let requests = upstream.requests();
        let (headers, body) = &requests[0];
        assert!(headers.get("authorization").is_none());
        assert_eq!(body["endpoint"], "https://tts.example.com/v1/audio/speech");
        assert_eq!(body["auth_header"], "X-Api-Key");
        assert_eq!(body["credential"], "secret");
        assert_eq!(body["input"], "Hello");
        assert_eq!(body["voice"], "nova");
    }

    #[tokio::test]
    async fn test_server_error_is_reported_without_retry() {
        let upstream = UpstreamStub::spawn(StatusCode::INTERNAL_SERVER_ERROR).await;
        let client = client(
            SpeechTransport::Direct {
                url: upstream.url.clone(),
                api_key: "sk-test".to_string(),
            },
            2,
        );

        let result = client.synthesize(hello()).await;
        match result {
            Err(SpeechError::ServiceError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream failure");
            }
            other => panic!("expected service error, got {:?}", other),
        }
        assert_eq!(upstream.requests().len(), 1);
    }
}
