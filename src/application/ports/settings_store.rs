//! Settings Ports - 设置持久化与设置服务
//!
//! 设置对象只有一个字段：参与者名称 -> 音色标识

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 设置错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Settings service stopped")]
    ServiceStopped,
}

/// 持久化的设置对象
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "characterMap", default)]
    pub character_map: BTreeMap<String, String>,
}

/// 扁平键值设置存储
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    /// 读取设置，不存在时返回默认值
    async fn load(&self) -> Result<Settings, SettingsError>;

    /// 写入设置
    async fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// 设置服务
///
/// 持有进程内唯一的 `characterMap`，每次修改后安排一次防抖保存
#[async_trait]
pub trait SettingsServicePort: Send + Sync {
    /// 读取参与者的已保存音色
    fn voice_for(&self, name: &str) -> Option<String>;

    /// 写入参与者音色并安排保存
    fn assign(&self, name: &str, voice: &str);

    /// 当前设置快照
    fn snapshot(&self) -> Settings;

    /// 立即写出待保存的修改
    async fn flush(&self) -> Result<(), SettingsError>;
}
