//! VOX 规则表
//!
//! 封闭词表、音节启发式与词重分类。
//! 词表成员直接影响边界位置，修改前请对照回归测试。

use crate::vox::tokenizer::{is_all_digits, is_titlecase_word, strip_trailing_punct, to_lower};
use crate::vox::types::Weight;

/// 功能词
pub const STOP_WORDS: &[&str] = &[
    "the", "thee", "a", "an", "to", "for", "of", "in", "on", "at", "by", "with", "from", "as",
    "is", "are", "was", "were", "this", "that",
];

/// 轻动词（播报语境中不承担重音）
pub const LIGHT_VERBS: &[&str] = &[
    "welcome",
    "wait",
    "stand",
    "provide",
    "provided",
    "return",
    "remain",
    "maintain",
    "maintained",
    "verify",
    "contact",
    "board",
    "arriving",
    "inbound",
    "bound",
    "commence",
    "commences",
];

/// 单位词
pub const UNITS: &[&str] = &["degrees", "hours", "percent", "%"];

/// 系动词前断句所用的限定词
pub const DETERMINERS: &[&str] = &[
    "the", "thee", "a", "an", "this", "that", "these", "those", "some", "any", "each", "every",
    "no",
];

/// 需要两侧隔离的连接词
pub const LINKERS: &[&str] = &["at", "in", "on", "to", "of", "for", "from", "by"];

/// "the" → "thee" 的前置介词
pub const THEE_PREPOSITIONS: &[&str] = &["to", "for", "of", "in", "on", "at"];

/// 区域专名引导词（大小写敏感）
pub const AREA_HEADS: &[&str] = &["Area", "Level", "Sector"];

/// 独立出现时作为硬边界的破折号
pub const DASHES: &[&str] = &["-", "\u{2013}", "\u{2014}"];

/// 词内可拆分的连字符/破折号
pub fn is_dash_char(ch: char) -> bool {
    matches!(ch, '-' | '\u{2013}' | '\u{2014}')
}

fn contains(list: &[&str], word: &str) -> bool {
    list.iter().any(|w| *w == word)
}

pub fn is_stop_word(lower: &str) -> bool {
    contains(STOP_WORDS, lower)
}

pub fn is_light_verb(lower: &str) -> bool {
    contains(LIGHT_VERBS, lower)
}

pub fn is_unit(lower: &str) -> bool {
    contains(UNITS, lower)
}

/// 限定词判断（忽略大小写与尾部标点）
pub fn is_determiner(token: &str) -> bool {
    contains(DETERMINERS, &to_lower(strip_trailing_punct(token)))
}

/// 连接词判断（忽略大小写与尾部标点）
pub fn is_linker(token: &str) -> bool {
    contains(LINKERS, &to_lower(strip_trailing_punct(token)))
}

pub fn is_thee_preposition(lower: &str) -> bool {
    contains(THEE_PREPOSITIONS, lower)
}

pub fn is_area_head(token: &str) -> bool {
    contains(AREA_HEADS, token)
}

pub fn is_standalone_dash(token: &str) -> bool {
    contains(DASHES, token)
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// 音节数估计
///
/// 元音簇计数；词尾不发音的 `e` 减一（`-le` 除外），`-le` 结尾加一；最少为 1
pub fn syllables(word: &str) -> u32 {
    if word.is_empty() {
        return 0;
    }
    let chars: Vec<char> = to_lower(word).chars().collect();
    let len = chars.len();

    let mut count: u32 = 0;
    let mut in_vowel = false;
    for &c in &chars {
        if is_vowel(c) {
            if !in_vowel {
                count += 1;
                in_vowel = true;
            }
        } else {
            in_vowel = false;
        }
    }

    let ends_with_e = chars[len - 1] == 'e';
    let ends_with_le = len > 2 && ends_with_e && chars[len - 2] == 'l';
    if count > 1 && len > 1 && ends_with_e && !ends_with_le {
        count -= 1;
    }
    if ends_with_le {
        count += 1;
    }
    count.max(1)
}

/// 词重分类
pub fn weight(token: &str) -> Weight {
    if token.is_empty() {
        return Weight::Light;
    }
    let bare = strip_trailing_punct(token);
    let lower = to_lower(bare);

    if is_stop_word(&lower) || is_light_verb(&lower) {
        return Weight::Light;
    }
    if is_all_digits(bare) || bare.contains('-') || is_titlecase_word(bare) || is_unit(&lower) {
        return Weight::Heavy;
    }
    // 长词或多音节实词
    if syllables(bare) >= 3 || bare.chars().count() >= 8 {
        return Weight::Heavy;
    }
    Weight::Medium
}
