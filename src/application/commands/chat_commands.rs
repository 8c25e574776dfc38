//! Chat Commands

/// 对当前聊天界面执行一次调和扫描
///
/// 由聊天观察者在启动时和每次界面变化后发出
#[derive(Debug, Clone, Default)]
pub struct ReconcileChat;
