//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TransportKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "QUOTE_TTS";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `QUOTE_TTS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `QUOTE_TTS_SERVER__PORT=8080`
/// - `QUOTE_TTS_TTS__API_KEY=sk-...`
/// - `QUOTE_TTS_TTS__TRANSPORT=proxy`
/// - `QUOTE_TTS_VOICES__CATALOG=alloy,nova,shimmer`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）；音色目录的默认值由 serde 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("tts.transport", "direct")?
        .set_default("tts.model", "tts-1")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("tts.max_retries", 0)?
        .set_default("tts.auth_header", "Authorization")?
        .set_default("settings.db_path", "data/settings.sled")?
        .set_default("settings.debounce_ms", 500)?
        .set_default("proxy.enabled", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: QUOTE_TTS_TTS__URL=https://tts.example.com/v1/audio/speech
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("voices.catalog")
            .with_list_parse_key("proxy.allowed_endpoints")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.voices.catalog.iter().all(|v| v.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "Voice catalog cannot be empty".to_string(),
        ));
    }

    match config.tts.transport {
        TransportKind::Proxy if config.tts.proxy_url.trim().is_empty() => {
            return Err(ConfigError::ValidationError(
                "Proxy transport requires tts.proxy_url".to_string(),
            ));
        }
        TransportKind::Direct if config.tts.api_key.is_empty() => {
            tracing::warn!("tts.api_key is empty; speech requests will be sent without credentials");
        }
        _ => {}
    }

    if config.settings.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Settings database path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 遮蔽密钥，只保留前几个字符
fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(empty)".to_string();
    }
    let prefix: String = secret.chars().take(3).collect();
    format!("{}****", prefix)
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("TTS Transport: {}", config.tts.transport);
    match config.tts.transport {
        TransportKind::Direct => {
            tracing::info!("TTS URL: {}", config.tts.url);
            tracing::info!("TTS API Key: {}", mask_secret(&config.tts.api_key));
        }
        TransportKind::Proxy => {
            tracing::info!("TTS Proxy: {} -> {}", config.tts.proxy_url, config.tts.url);
            tracing::info!(
                "TTS Credential: {}: {}",
                config.tts.auth_header,
                mask_secret(&config.tts.credential)
            );
        }
        TransportKind::Fake => {}
    }
    tracing::info!("TTS Model: {}", config.tts.model);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Voices: {}", config.voices.catalog.join(", "));
    tracing::info!("Error Display: {}ms", config.playback.error_display_ms);
    tracing::info!("Settings DB: {}", config.settings.db_path);
    tracing::info!("Settings Debounce: {}ms", config.settings.debounce_ms);
    tracing::info!("Speech Proxy Endpoint: {}", config.proxy.enabled);
    if config.proxy.enabled {
        tracing::info!(
            "Speech Proxy Upstreams: {}",
            config.proxy.endpoints(&config.tts.url).join(", ")
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_catalog() {
        let mut config = AppConfig::default();
        config.voices.catalog = vec![" ".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_proxy_transport_requires_proxy_url() {
        let mut config = AppConfig::default();
        config.tts.transport = TransportKind::Proxy;
        assert!(validate_config(&config).is_err());

        config.tts.proxy_url = "http://localhost:5060/api/tts/proxy".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quote-tts.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8081

[tts]
transport = "fake"

[voices]
catalog = ["nova", "alloy"]
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.tts.transport, TransportKind::Fake);
        assert_eq!(config.voices.catalog, vec!["nova", "alloy"]);
        assert_eq!(config.settings.debounce_ms, 500);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "(empty)");
        assert_eq!(mask_secret("sk-abcdef"), "sk-****");
    }
}
