//! Voice Catalog - 音色目录
//!
//! 静态只读的音色列表，第一个音色作为全局兜底音色

use std::collections::HashSet;

use super::{VoiceError, VoiceId};

/// 内置音色列表（语言/地区标记的神经网络音色）
pub const DEFAULT_VOICES: &[&str] = &[
    "zh-CN-XiaoxiaoNeural",
    "zh-CN-XiaoyiNeural",
    "zh-CN-YunjianNeural",
    "zh-CN-YunxiNeural",
    "zh-CN-YunxiaNeural",
    "zh-CN-YunyangNeural",
    "zh-CN-liaoning-XiaobeiNeural",
    "zh-CN-shaanxi-XiaoniNeural",
    "zh-HK-HiuGaaiNeural",
    "zh-HK-HiuMaanNeural",
    "zh-HK-WanLungNeural",
    "zh-TW-HsiaoChenNeural",
    "zh-TW-HsiaoYuNeural",
    "zh-TW-YunJheNeural",
    "ja-JP-NanamiNeural",
    "ja-JP-KeitaNeural",
    "en-US-AriaNeural",
    "en-US-JennyNeural",
    "en-US-GuyNeural",
];

/// 音色目录
///
/// 不变量:
/// - 至少包含一个音色
/// - 音色不重复，保持配置中的顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Vec<VoiceId>,
}

impl VoiceCatalog {
    /// 从音色标识列表创建目录（去重并保持顺序）
    pub fn new<I, S>(ids: I) -> Result<Self, VoiceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut voices = Vec::new();
        for id in ids {
            let voice = VoiceId::new(id)?;
            if seen.insert(voice.clone()) {
                voices.push(voice);
            }
        }

        if voices.is_empty() {
            return Err(VoiceError::EmptyCatalog);
        }

        Ok(Self { voices })
    }

    /// 按顺序列出所有音色
    pub fn list_voices(&self) -> &[VoiceId] {
        &self.voices
    }

    /// 兜底音色（目录第一项）
    pub fn fallback(&self) -> &VoiceId {
        // 构造时保证非空
        &self.voices[0]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.voices.iter().any(|v| v.as_str() == id)
    }

    /// 校验存储的音色，未知或缺失时回退到兜底音色
    pub fn resolve(&self, id: Option<&str>) -> VoiceId {
        id.and_then(|id| self.require(id).ok())
            .unwrap_or_else(|| self.fallback().clone())
    }

    /// 查找目录中的音色，不存在则报错
    pub fn require(&self, id: &str) -> Result<VoiceId, VoiceError> {
        self.voices
            .iter()
            .find(|v| v.as_str() == id.trim())
            .cloned()
            .ok_or_else(|| VoiceError::NotInCatalog(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self {
            voices: DEFAULT_VOICES
                .iter()
                .filter_map(|v| VoiceId::new(*v).ok())
                .collect(),
        }
    }
}
