//! Participant Context - Value Objects

use serde::{Deserialize, Serialize};

/// 参与者显示名
///
/// 不变量:
/// - 已去除首尾空白
/// - 非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, &'static str> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err("参与者名称不能为空");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
