//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 可用音色目录（静态、只读）
//! - 音色标识校验

mod catalog;
mod errors;
mod value_objects;

pub use catalog::{VoiceCatalog, DEFAULT_VOICES};
pub use errors::VoiceError;
pub use value_objects::{AudioFormat, VoiceId};
