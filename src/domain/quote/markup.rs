//! 标记处理
//!
//! - 去除 HTML 标签并解码实体，得到朗读用的纯文本
//! - 渲染注入到引号后的播放控件

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// 注入控件的起始文本，同时充当"已处理"标记
pub const CONTROL_MARKER: &str = r#"<span class="quote-tts-btn""#;

/// 控件空闲状态图标
pub const CONTROL_ICON: &str = "🔊";

fn tag_regex() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern must compile"))
}

fn entity_regex() -> &'static Regex {
    static ENTITY_RE: OnceLock<Regex> = OnceLock::new();
    ENTITY_RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});")
            .expect("entity pattern must compile")
    })
}

/// 去除片段中的标签并解码实体（等价于渲染后取 textContent）
pub fn strip_markup(fragment: &str) -> String {
    let without_tags = tag_regex().replace_all(fragment, "");
    decode_entities(&without_tags)
}

/// 解码 HTML 实体，无法识别的实体原样保留
pub fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(number) = entity.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let ch = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "hellip" => '…',
        "mdash" => '—',
        _ => return None,
    };
    Some(ch.to_string())
}

/// URL 安全编码（base64url，无填充）
pub fn encode_url_safe(value: &str) -> String {
    URL_SAFE_NO_PAD.encode(value.as_bytes())
}

/// 解码 [`encode_url_safe`] 的结果
pub fn decode_url_safe(value: &str) -> Option<String> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
}

/// 渲染播放控件
///
/// 控件只携带编码后的数据，不包含任何原始文本，
/// 保证再次扫描时不会在控件内部匹配到引号
pub fn render_control(index: usize, speaker: &str, text: &str) -> String {
    format!(
        r#"{} data-quote="{}" data-speaker="{}" data-text="{}" title="播放">{}</span>"#,
        CONTROL_MARKER,
        index,
        encode_url_safe(speaker),
        encode_url_safe(text),
        CONTROL_ICON
    )
}

/// 已嵌入标记中的播放控件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedControl {
    pub index: usize,
    pub speaker: String,
    pub text: String,
}

fn control_regex() -> &'static Regex {
    static CONTROL_RE: OnceLock<Regex> = OnceLock::new();
    CONTROL_RE.get_or_init(|| {
        let pattern = format!(
            r#"{} data-quote="([0-9]+)" data-speaker="([A-Za-z0-9_-]*)" data-text="([A-Za-z0-9_-]*)""#,
            regex::escape(CONTROL_MARKER)
        );
        Regex::new(&pattern).expect("control pattern must compile")
    })
}

/// 解析标记中已有的播放控件，数据无法解码的控件被跳过
pub fn embedded_controls(markup: &str) -> Vec<EmbeddedControl> {
    control_regex()
        .captures_iter(markup)
        .filter_map(|caps| {
            Some(EmbeddedControl {
                index: caps[1].parse().ok()?,
                speaker: decode_url_safe(&caps[2])?,
                text: decode_url_safe(&caps[3])?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_tags() {
        assert_eq!(strip_markup("<em>Run</em>, <b>now</b>!"), "Run, now!");
        assert_eq!(strip_markup("line<br/>break"), "linebreak");
    }

    #[test]
    fn test_strip_markup_decodes_entities() {
        assert_eq!(strip_markup("Tom &amp; Jerry &lt;3"), "Tom & Jerry <3");
        assert_eq!(strip_markup("&#20320;&#x597D;"), "你好");
        assert_eq!(strip_markup("&bogus; stays"), "&bogus; stays");
    }

    #[test]
    fn test_url_safe_encoding() {
        let encoded = encode_url_safe("你好? a/b+c");
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_url_safe(&encoded).as_deref(), Some("你好? a/b+c"));
        assert_eq!(decode_url_safe("%%%"), None);
    }

    #[test]
    fn test_render_control_starts_with_marker() {
        let control = render_control(3, "Alice", "Hello");
        assert!(control.starts_with(CONTROL_MARKER));
        assert!(control.contains(r#"data-quote="3""#));
        assert!(control.contains(&format!(r#"data-speaker="{}""#, encode_url_safe("Alice"))));
        assert!(!control.contains("Hello"));
    }

    #[test]
    fn test_embedded_controls_read_back_rendered_data() {
        let markup = format!(
            "“Hi”{} and “Bye”{} <span class=\"other\">x</span>",
            render_control(0, "Alice", "Hi"),
            render_control(1, "Bob", "Bye")
        );
        let controls = embedded_controls(&markup);
        assert_eq!(
            controls,
            vec![
                EmbeddedControl {
                    index: 0,
                    speaker: "Alice".to_string(),
                    text: "Hi".to_string(),
                },
                EmbeddedControl {
                    index: 1,
                    speaker: "Bob".to_string(),
                    text: "Bye".to_string(),
                },
            ]
        );
        assert!(embedded_controls("no controls here").is_empty());
    }
}
