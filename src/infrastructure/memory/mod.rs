//! Memory Layer - In-Memory State Management
//!
//! 聊天界面镜像、控件注册表、已处理消息集合和防抖设置服务的内存实现

mod augmentation_store;
mod chat_surface;
mod control_registry;
mod settings_service;

pub use augmentation_store::InMemoryAugmentationStore;
pub use chat_surface::{ChatMutation, InMemoryChatSurface};
pub use control_registry::InMemoryControlRegistry;
pub use settings_service::DebouncedSettingsService;
