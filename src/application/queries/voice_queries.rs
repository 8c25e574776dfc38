//! Voice Queries

/// 列出音色目录
#[derive(Debug, Clone)]
pub struct ListVoices;
