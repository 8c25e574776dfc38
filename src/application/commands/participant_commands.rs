//! Participant Commands

use crate::application::ports::ControlId;

/// 为参与者指定音色
#[derive(Debug, Clone)]
pub struct AssignVoice {
    pub participant: String,
    pub voice: String,
}

/// 为尚未分配音色的参与者写入兜底音色
#[derive(Debug, Clone, Default)]
pub struct FillDefaultVoices;

/// 用当前选择的音色试听
#[derive(Debug, Clone)]
pub struct PreviewVoice {
    pub participant: String,
    /// 下拉框中当前选中的音色（未必已保存）
    pub voice: String,
}

/// 激活台词播放控件
#[derive(Debug, Clone)]
pub struct ActivateControl {
    pub control_id: ControlId,
}
