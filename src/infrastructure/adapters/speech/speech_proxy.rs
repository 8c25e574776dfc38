//! Speech Proxy - 同源代理转发
//!
//! 接收 ProxySpeechPayload，把其中的请求体转发到 endpoint，
//! 认证信息以 `auth_header: credential` 形式附加，原样返回上游的状态和音频。
//! 只转发到配置中允许的上游地址

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

use super::ProxySpeechPayload;
use crate::application::ports::SpeechError;

/// 上游响应
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// 语音服务代理
pub struct SpeechProxy {
    client: Client,
    allowed_endpoints: Vec<String>,
}

impl SpeechProxy {
    pub fn new(timeout_secs: u64, allowed_endpoints: Vec<String>) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            allowed_endpoints,
        })
    }

    fn is_allowed(&self, endpoint: &str) -> bool {
        self.allowed_endpoints.iter().any(|allowed| allowed == endpoint)
    }

    pub async fn forward(&self, payload: ProxySpeechPayload) -> Result<ProxiedResponse, SpeechError> {
        let endpoint = payload.endpoint.trim();
        if !self.is_allowed(endpoint) {
            tracing::warn!(endpoint = %endpoint, "Speech proxy endpoint not allowed");
            return Err(SpeechError::InvalidRequest(format!(
                "Endpoint not allowed: {}",
                endpoint
            )));
        }

        let header_name = HeaderName::from_bytes(payload.auth_header.trim().as_bytes())
            .map_err(|e| SpeechError::InvalidRequest(format!("Invalid auth header name: {}", e)))?;
        let header_value = HeaderValue::from_str(&payload.credential)
            .map_err(|e| SpeechError::InvalidRequest(format!("Invalid credential: {}", e)))?;

        tracing::debug!(
            endpoint = %endpoint,
            auth_header = %header_name,
            voice = %payload.body.voice,
            "Forwarding speech request"
        );

        let response = self
            .client
            .post(endpoint)
            .header(header_name, header_value)
            .json(&payload.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::Timeout
                } else {
                    SpeechError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| SpeechError::NetworkError(format!("Failed to read upstream body: {}", e)))?
            .to_vec();

        if !(200..300).contains(&status) {
            tracing::warn!(endpoint = %endpoint, status = status, "Upstream speech error");
        }

        Ok(ProxiedResponse {
            status,
            content_type,
            body,
        })
    }
}
