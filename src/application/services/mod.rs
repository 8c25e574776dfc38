//! 应用服务
//!
//! 被多个命令/查询处理器共享的用例逻辑

mod playback;
mod voice_assignment;

pub use playback::{
    Activation, PlaybackConfig, PlaybackController, PlaybackFailure, PlaybackOutcome, DEFAULT_ERROR_DISPLAY_MS,
    DEFAULT_PREVIEW_TEXT, StartedPlayback,
};
pub use voice_assignment::VoiceAssignmentStore;
