//! Worker Layer - Background Task Processing
//!
//! 实现 ChatObserver，根据聊天界面变化执行调和扫描

mod chat_observer;

pub use chat_observer::ChatObserver;
