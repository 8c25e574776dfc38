//! Persistence Layer - 数据持久化
//!
//! Sled 扁平键值存储

pub mod sled;

pub use self::sled::SledSettingsStore;
