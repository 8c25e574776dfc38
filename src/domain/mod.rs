//! Domain Layer - 领域层
//!
//! 包含四个限界上下文:
//! - Voice Context: 音色目录
//! - Participant Context: 对话参与者识别
//! - Chat Context: 聊天消息快照
//! - Quote Context: 引号台词提取与说话人归属

pub mod chat;
pub mod participant;
pub mod quote;
pub mod voice;

pub use chat::{ChatMessage, ChatSnapshot, MessageId};
pub use participant::{scan_participants, ParticipantName, DEFAULT_USER_NAME};
pub use quote::{
    decode_url_safe, embedded_controls, extract_quotes, find_inline_speakers, strip_markup,
    EmbeddedControl, Extraction, QuoteSpan, CONTROL_MARKER,
};
pub use voice::{AudioFormat, VoiceCatalog, VoiceError, VoiceId, DEFAULT_VOICES};
