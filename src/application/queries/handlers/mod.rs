//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod chat_handlers;
mod participant_handlers;
mod voice_handlers;

pub use chat_handlers::*;
pub use participant_handlers::*;
pub use voice_handlers::*;
