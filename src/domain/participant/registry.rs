//! Participant Registry - 参与者识别
//!
//! 多种信号合并为一个去重集合：
//! 1. 当前用户名（缺省为 "User"）
//! 2. 当前主角色名
//! 3. 已渲染消息的发送者
//! 4. 消息正文中行内 `名字:` 标签引出的说话人

use std::collections::HashSet;

use super::ParticipantName;
use crate::domain::chat::ChatSnapshot;
use crate::domain::quote::find_inline_speakers;

/// 未设置用户名时使用的名称
pub const DEFAULT_USER_NAME: &str = "User";

/// 按发现顺序保存的去重集合
#[derive(Debug, Default)]
struct ParticipantSet {
    seen: HashSet<ParticipantName>,
    ordered: Vec<ParticipantName>,
}

impl ParticipantSet {
    fn insert(&mut self, raw: &str) {
        let Ok(name) = ParticipantName::new(raw) else {
            return;
        };
        if self.seen.insert(name.clone()) {
            self.ordered.push(name);
        }
    }

    fn into_vec(self) -> Vec<ParticipantName> {
        self.ordered
    }
}

/// 扫描聊天快照中的全部参与者
///
/// 结果按首次发现的顺序排列；空结果由调用方按"空状态"处理
pub fn scan_participants(snapshot: &ChatSnapshot) -> Vec<ParticipantName> {
    let mut participants = ParticipantSet::default();

    let user_name = snapshot
        .user_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_USER_NAME);
    participants.insert(user_name);

    if let Some(character) = snapshot.character_name.as_deref() {
        participants.insert(character);
    }

    for message in &snapshot.messages {
        participants.insert(&message.sender);
    }

    // 生成中的消息正文尚不完整，不参与行内说话人识别
    for message in snapshot.messages.iter().filter(|m| !m.in_progress) {
        for speaker in find_inline_speakers(&message.content) {
            participants.insert(&speaker);
        }
    }

    participants.into_vec()
}
