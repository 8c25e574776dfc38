//! Clip Store - 临时音频存储
//!
//! 播放期间音频通过 `/api/audio/{clip_id}` 对外提供，播放结束后立即撤销

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::ControlId;
use crate::domain::AudioFormat;

/// 临时音频
#[derive(Debug, Clone)]
pub struct StoredClip {
    pub control_id: ControlId,
    pub data: Arc<Vec<u8>>,
    pub format: AudioFormat,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// 临时音频存储
#[derive(Default)]
pub struct ClipStore {
    clips: DashMap<Uuid, StoredClip>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, clip: StoredClip) -> Uuid {
        let clip_id = Uuid::new_v4();
        self.clips.insert(clip_id, clip);
        clip_id
    }

    pub fn get(&self, clip_id: &Uuid) -> Option<StoredClip> {
        self.clips.get(clip_id).map(|c| c.clone())
    }

    /// 撤销临时音频，返回是否存在
    pub fn revoke(&self, clip_id: &Uuid) -> bool {
        self.clips.remove(clip_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_revoke() {
        let store = ClipStore::new();
        let clip_id = store.insert(StoredClip {
            control_id: ControlId::new("c1"),
            data: Arc::new(vec![1, 2, 3]),
            format: AudioFormat::Mp3,
            duration_ms: 10,
            created_at: Utc::now(),
        });

        assert_eq!(store.get(&clip_id).unwrap().data.as_slice(), &[1, 2, 3]);
        assert!(store.revoke(&clip_id));
        assert!(store.get(&clip_id).is_none());
        assert!(!store.revoke(&clip_id));
        assert!(store.is_empty());
    }
}
