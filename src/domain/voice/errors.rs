//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("无效的音色标识: {0}")]
    InvalidId(String),

    #[error("音色目录不能为空")]
    EmptyCatalog,

    #[error("音色不在目录中: {0}")]
    NotInCatalog(String),
}
