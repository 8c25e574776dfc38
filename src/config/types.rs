//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::{DEFAULT_ERROR_DISPLAY_MS, DEFAULT_PREVIEW_TEXT};
use crate::domain::DEFAULT_VOICES;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音服务配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 音色目录
    #[serde(default)]
    pub voices: VoicesConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackSettings,

    /// 设置存储配置
    #[serde(default)]
    pub settings: SettingsConfig,

    /// 同源代理配置
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit: default_body_limit(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 语音服务的调用方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// 直接请求语音服务（Bearer 认证）
    #[default]
    Direct,
    /// 经由同源代理转发
    Proxy,
    /// 本地生成静音音频，不访问网络
    Fake,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Proxy => "proxy",
            Self::Fake => "fake",
        };
        write!(f, "{}", name)
    }
}

/// 语音服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub transport: TransportKind,

    /// 语音合成接口地址
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// Direct 方式使用的 API Key
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_tts_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// Proxy 方式的代理地址
    #[serde(default)]
    pub proxy_url: String,

    /// Proxy 方式转发时使用的认证头名称
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Proxy 方式转发时使用的认证头值
    #[serde(default)]
    pub credential: String,
}

fn default_tts_url() -> String {
    "https://api.openai.com/v1/audio/speech".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_auth_header() -> String {
    "Authorization".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            url: default_tts_url(),
            api_key: String::new(),
            model: default_tts_model(),
            timeout_secs: default_tts_timeout(),
            max_retries: 0,
            proxy_url: String::new(),
            auth_header: default_auth_header(),
            credential: String::new(),
        }
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    /// 可选音色，第一项为兜底音色
    #[serde(default = "default_catalog")]
    pub catalog: Vec<String>,
}

fn default_catalog() -> Vec<String> {
    DEFAULT_VOICES.iter().map(|v| v.to_string()).collect()
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackSettings {
    /// 出错后错误图标的显示时长（毫秒）
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,

    /// 试听使用的固定文本
    #[serde(default = "default_preview_text")]
    pub preview_text: String,
}

fn default_error_display_ms() -> u64 {
    DEFAULT_ERROR_DISPLAY_MS
}

fn default_preview_text() -> String {
    DEFAULT_PREVIEW_TEXT.to_string()
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            error_display_ms: default_error_display_ms(),
            preview_text: default_preview_text(),
        }
    }
}

/// 设置存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// sled 数据库目录
    #[serde(default = "default_settings_path")]
    pub db_path: String,

    /// 保存防抖间隔（毫秒）
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_settings_path() -> String {
    "data/settings.sled".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            db_path: default_settings_path(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// 同源代理配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// 是否开放 `/api/tts/proxy`
    #[serde(default)]
    pub enabled: bool,

    /// 除 `tts.url` 外允许转发的上游地址
    #[serde(default)]
    pub allowed_endpoints: Vec<String>,
}

impl ProxyConfig {
    /// 代理允许转发的全部上游地址（总是包含语音服务地址）
    pub fn endpoints(&self, tts_url: &str) -> Vec<String> {
        std::iter::once(tts_url)
            .chain(self.allowed_endpoints.iter().map(String::as_str))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
