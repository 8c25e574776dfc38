//! Chat Context - 聊天消息快照
//!
//! 宿主聊天界面的只读视图：已渲染的消息及当前身份

mod entities;

pub use entities::{ChatMessage, ChatSnapshot, MessageId};
