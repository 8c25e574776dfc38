//! Participant Context - 对话参与者
//!
//! 参与者只以显示名标识，每次扫描重新计算

mod registry;
mod value_objects;

pub use registry::{scan_participants, DEFAULT_USER_NAME};
pub use value_objects::ParticipantName;
