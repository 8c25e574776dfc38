//! Participant Queries

/// 扫描参与者并解析各自音色（设置面板刷新）
#[derive(Debug, Clone, Default)]
pub struct ScanParticipants;

/// 获取单个参与者的音色
#[derive(Debug, Clone)]
pub struct GetParticipantVoice {
    pub participant: String,
}
