//! Quote Context - 引号台词提取
//!
//! 职责:
//! - 从渲染后的消息中定位引号台词
//! - 行内 `名字:` 说话人归属
//! - 注入播放控件并保证重复扫描幂等

mod extractor;
mod markup;

pub use extractor::{
    extract_quotes, find_inline_speakers, Extraction, QuoteSpan, MAX_SPEAKER_CHARS,
};
pub use markup::{
    decode_entities, decode_url_safe, embedded_controls, encode_url_safe, render_control,
    strip_markup, EmbeddedControl, CONTROL_ICON, CONTROL_MARKER,
};
