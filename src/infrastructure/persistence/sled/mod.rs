//! Sled 存储实现

mod settings_store;

pub use settings_store::{SledSettingsConfig, SledSettingsStore, SETTINGS_KEY};
