//! VOX 输出整理
//!
//! 单句整理（tidy）、句末节奏、整段拼接与可选的厂商标签包裹

use regex::Regex;

use crate::vox::types::{pause_directive, BREAK, SENTENCE_PAUSE, VOX_DISABLE, VOX_ENABLE};

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
    static ref BREAK_SPACING: Regex = Regex::new(r"\s*\\!br\s*").expect("break spacing pattern");
    static ref BREAK_RUN: Regex = Regex::new(r"(\s*\\!br\s*){2,}").expect("break run pattern");
    static ref SPACE_BEFORE_PUNCT: Regex =
        Regex::new(r"\s+([.,!?;:])").expect("space before punctuation pattern");
    static ref BREAK_BEFORE_PUNCT: Regex =
        Regex::new(r"\\!br\s*([,;:])").expect("break before punctuation pattern");
}

/// 规范空白与边界标记间距（幂等）
pub fn tidy(text: &str) -> String {
    let spaced = format!(" {} ", BREAK);
    let t = WHITESPACE.replace_all(text, " ");
    let t = BREAK_SPACING.replace_all(&t, spaced.as_str());
    let t = BREAK_RUN.replace_all(&t, spaced.as_str());
    let t = SPACE_BEFORE_PUNCT.replace_all(&t, "$1");
    t.trim().to_string()
}

/// 句末节奏：约 500ms 停顿 + 边界
pub fn with_cadence(sentence: &str) -> String {
    let mut out = String::with_capacity(sentence.len() + 16);
    out.push_str(sentence);
    if !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(&pause_directive(SENTENCE_PAUSE));
    out.push(' ');
    out.push_str(BREAK);
    out
}

/// 拼接后整段收尾，非空时按需包裹 `\!wH1 ... \!wH0`
pub fn finalize(joined: &str, wrap_vox_tags: bool) -> String {
    let spaced = format!(" {} ", BREAK);
    let out = BREAK_RUN.replace_all(joined.trim(), spaced.as_str());
    let out = BREAK_BEFORE_PUNCT.replace_all(&out, format!("$1 {}", BREAK).as_str());

    if out.is_empty() {
        return String::new();
    }
    if wrap_vox_tags {
        format!("{} {} {} ", VOX_ENABLE, out, VOX_DISABLE)
    } else {
        format!("{} ", out)
    }
}

/// 调试用可视化：`\!wH1` → `[wH1]`，`\!wH0` → `[wH0]`，`\!br` → `[BR]`
pub fn visualize_markup(text: &str) -> String {
    text.replace(VOX_ENABLE, "[wH1]")
        .replace(VOX_DISABLE, "[wH0]")
        .replace(BREAK, "[BR]")
}
