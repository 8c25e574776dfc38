//! Sled-based Settings Store Implementation
//!
//! 设置对象以 JSON 形式保存在单个键下：`{"characterMap": {...}}`

use async_trait::async_trait;
use sled::Db;
use std::path::Path;

use crate::application::ports::{Settings, SettingsError, SettingsStorePort};

/// 设置对象所在的键
pub const SETTINGS_KEY: &str = "quote_tts";

/// Sled 设置存储配置
#[derive(Debug, Clone)]
pub struct SledSettingsConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledSettingsConfig {
    fn default() -> Self {
        Self {
            db_path: "data/settings.sled".to_string(),
        }
    }
}

/// Sled 设置存储
pub struct SledSettingsStore {
    db: Db,
}

impl SledSettingsStore {
    pub fn new(config: &SledSettingsConfig) -> Result<Self, SettingsError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        tracing::info!(db_path = %config.db_path, "SledSettingsStore initialized");

        Ok(Self { db })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let config = SledSettingsConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }
}

#[async_trait]
impl SettingsStorePort for SledSettingsStore {
    async fn load(&self) -> Result<Settings, SettingsError> {
        let Some(value) = self
            .db
            .get(SETTINGS_KEY)
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?
        else {
            return Ok(Settings::default());
        };

        serde_json::from_slice(&value).map_err(|e| SettingsError::SerializationError(e.to_string()))
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let value = serde_json::to_vec(settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        self.db
            .insert(SETTINGS_KEY, value)
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| SettingsError::DatabaseError(e.to_string()))?;

        tracing::debug!(entries = settings.character_map.len(), "Settings persisted");
        Ok(())
    }
}
