//! 引号台词提取与说话人归属
//!
//! 匹配规则:
//! - 成对引号：“…”、‘…’、「…」、『…』（不含直引号，避免误匹配撇号和代码）
//! - 引号内容非贪婪匹配，一个消息块内的多段台词互不吞并
//! - 引号前紧邻 `名字:` / `名字：`（位于行首或标签结束 `>` 之后）时，名字即说话人，
//!   否则说话人为消息块发送者
//!
//! 幂等:
//! - 内容包含控件标记、或紧跟控件标记的引号保持原样

use regex::{Captures, Regex};
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;

use super::markup::{render_control, strip_markup, CONTROL_MARKER};

/// 行内说话人名字的最大字符数
pub const MAX_SPEAKER_CHARS: usize = 30;

/// 说话人名字允许的字符（排除冒号、标签分隔符和各类引号）
const SPEAKER_CLASS: &str = r#"[^:：<>\r\n"“”‘’「」『』]"#;

/// 捕获组名称与对应的开闭引号
const QUOTE_GROUPS: &[(&str, char, char)] = &[
    ("dq", '“', '”'),
    ("sq", '‘', '’'),
    ("cb", '「', '」'),
    ("wcb", '『', '』'),
];

fn quote_regex() -> &'static Regex {
    static QUOTE_RE: OnceLock<Regex> = OnceLock::new();
    QUOTE_RE.get_or_init(|| {
        let pattern = format!(
            r"(?m)(?:(?:^|>)[ \t]*(?P<speaker>{class}{{1,{max}}}?)[ \t]*[:：][ \t]*)?(?:“(?P<dq>(?s:.*?))”|‘(?P<sq>(?s:.*?))’|「(?P<cb>(?s:.*?))」|『(?P<wcb>(?s:.*?))』)",
            class = SPEAKER_CLASS,
            max = MAX_SPEAKER_CHARS,
        );
        Regex::new(&pattern).expect("quote pattern must compile")
    })
}

/// 单段引号台词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteSpan {
    /// 控件序号（在消息块内唯一）
    pub index: usize,
    /// 归属的说话人
    pub speaker: String,
    /// 说话人是否来自行内 `名字:` 标签
    pub inline_speaker: bool,
    /// 引号内的原始标记
    pub raw_markup: String,
    /// 去除标记后的朗读文本
    pub plain_text: String,
    /// 整段引号（含引号本身）在输入中的字节范围
    pub source_range: Range<usize>,
}

/// 一次提取的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// 注入控件后的标记；没有接受任何引号时与输入完全相同
    pub markup: String,
    pub spans: Vec<QuoteSpan>,
}

impl Extraction {
    /// 是否有引号被注入控件
    pub fn changed(&self) -> bool {
        !self.spans.is_empty()
    }
}

struct QuoteMatch<'t> {
    inner: &'t str,
    range: Range<usize>,
}

impl<'t> QuoteMatch<'t> {
    fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        QUOTE_GROUPS.iter().find_map(|(name, open, close)| {
            caps.name(name).map(|m| QuoteMatch {
                inner: m.as_str(),
                range: (m.start() - open.len_utf8())..(m.end() + close.len_utf8()),
            })
        })
    }
}

fn inline_speaker(caps: &Captures<'_>) -> Option<String> {
    let name = strip_markup(caps.name("speaker")?.as_str());
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// 提取消息中的引号台词并在每段台词后注入播放控件
///
/// 纯函数：不依赖任何渲染界面，重复调用不会产生重复控件
pub fn extract_quotes(text: &str, block_sender: &str) -> Extraction {
    // 已存在的控件占用的序号，新控件接续编号
    let base_index = text.matches(CONTROL_MARKER).count();
    let block_sender = block_sender.trim();

    let mut markup = String::with_capacity(text.len());
    let mut spans: Vec<QuoteSpan> = Vec::new();
    let mut cursor = 0;

    for caps in quote_regex().captures_iter(text) {
        let Some(quote) = QuoteMatch::from_captures(&caps) else {
            continue;
        };

        if quote.inner.contains(CONTROL_MARKER)
            || text[quote.range.end..].starts_with(CONTROL_MARKER)
        {
            continue;
        }

        let plain_text = strip_markup(quote.inner).trim().to_string();
        if plain_text.is_empty() {
            continue;
        }

        let inline = inline_speaker(&caps);
        let inline_speaker = inline.is_some();
        let speaker = inline.unwrap_or_else(|| block_sender.to_string());
        let index = base_index + spans.len();

        markup.push_str(&text[cursor..quote.range.end]);
        markup.push_str(&render_control(index, &speaker, &plain_text));
        cursor = quote.range.end;

        spans.push(QuoteSpan {
            index,
            speaker,
            inline_speaker,
            raw_markup: quote.inner.to_string(),
            plain_text,
            source_range: quote.range,
        });
    }

    if spans.is_empty() {
        return Extraction {
            markup: text.to_string(),
            spans,
        };
    }

    markup.push_str(&text[cursor..]);
    Extraction { markup, spans }
}

/// 收集文本中所有通过行内 `名字:` 标签出现的说话人
pub fn find_inline_speakers(text: &str) -> Vec<String> {
    quote_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let quote = QuoteMatch::from_captures(&caps)?;
            if strip_markup(quote.inner).trim().is_empty() {
                return None;
            }
            inline_speaker(&caps)
        })
        .collect()
}
