//! Audio Adapter - 临时音频存储与播放

mod clip_player;
mod clip_store;

pub use clip_player::{measure_duration, ClipPlayer, ClipPlayerConfig, CLIP_ROUTE_PREFIX};
pub use clip_store::{ClipStore, StoredClip};
