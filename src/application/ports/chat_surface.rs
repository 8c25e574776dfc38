//! Chat Surface Port - 宿主聊天界面的只读视图

use crate::domain::ChatSnapshot;

/// Chat Surface Port
pub trait ChatSurfacePort: Send + Sync {
    /// 当前渲染的消息及身份信息
    fn snapshot(&self) -> ChatSnapshot;
}
