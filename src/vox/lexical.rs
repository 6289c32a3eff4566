//! VOX 词汇改写
//!
//! - "the" → "thee"：介词之后，或专名/字母/数字之前
//! - 开场短语之后插入边界

use regex::Regex;

use crate::vox::rules::is_thee_preposition;
use crate::vox::tokenizer::{
    is_all_digits, is_single_letter, is_titlecase_word, join_tokens, split_tail,
    strip_trailing_punct, to_lower, tokenize,
};
use crate::vox::types::{is_marker, BREAK};

lazy_static::lazy_static! {
    /// 句首开场短语
    static ref LEAD_IN: Regex = Regex::new(
        r"(?i)^\s*((?:Now|Please|A\s+reminder|On\s+behalf\s+of|Good\s+(?:morning|evening)|This\s+(?:automated\s+train|tram)))\b",
    )
    .expect("lead-in pattern");
}

/// 第 `nth` 个（从 1 开始）前方非标记 token，已去标点并小写化
fn prev_word(tokens: &[&str], index: usize, nth: usize) -> Option<String> {
    tokens[..index]
        .iter()
        .rev()
        .filter(|t| !is_marker(t))
        .nth(nth - 1)
        .map(|t| to_lower(strip_trailing_punct(t)))
}

/// 后方第一个非标记 token（保留大小写）
fn next_word<'a>(tokens: &[&'a str], index: usize) -> Option<&'a str> {
    tokens[index + 1..].iter().copied().find(|t| !is_marker(t))
}

/// 后向触发：介词之后，或 "on behalf of" 之后
fn backward_trigger(tokens: &[&str], index: usize) -> bool {
    let Some(p1) = prev_word(tokens, index, 1) else {
        return false;
    };
    if is_thee_preposition(&p1) {
        return true;
    }
    p1 == "of"
        && prev_word(tokens, index, 2).as_deref() == Some("behalf")
        && prev_word(tokens, index, 3).as_deref() == Some("on")
}

/// 前向触发：专名、单字母（X 或 X:）、数字之前
fn forward_trigger(tokens: &[&str], index: usize) -> bool {
    next_word(tokens, index)
        .map(|next| {
            is_titlecase_word(strip_trailing_punct(next))
                || is_single_letter(next)
                || is_all_digits(strip_trailing_punct(next))
        })
        .unwrap_or(false)
}

/// "the" → "thee"
///
/// 跨越 `\!br` 标记查找相邻词；保留尾部标点
pub fn apply_thee_rule(sentence: &str) -> String {
    let tokens = tokenize(sentence);
    if tokens.is_empty() {
        return String::new();
    }

    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        if is_marker(token) {
            out.push(token.to_string());
            continue;
        }

        let (core, tail) = split_tail(token);
        if to_lower(core) != "the" {
            out.push(token.to_string());
            continue;
        }

        if backward_trigger(&tokens, i) || forward_trigger(&tokens, i) {
            out.push(format!("thee{}", tail));
        } else {
            out.push(token.to_string());
        }
    }

    join_tokens(&out)
}

/// 开场短语后插入边界
pub fn apply_lead_in_break(sentence: &str) -> String {
    match LEAD_IN.find(sentence) {
        Some(m) => {
            let head = m.as_str().trim();
            let rest = sentence[m.end()..].trim();
            format!("{} {} {}", head, BREAK, rest)
        }
        None => sentence.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thee_after_preposition() {
        assert_eq!(
            apply_thee_rule("Please proceed to the exit."),
            "Please proceed to thee exit."
        );
        assert_eq!(apply_thee_rule("Stand at the door"), "Stand at thee door");
    }

    #[test]
    fn test_thee_before_proper_noun_letter_or_number() {
        assert_eq!(apply_thee_rule("Mind the Gap."), "Mind thee Gap.");
        assert_eq!(apply_thee_rule("Use the C: line"), "Use thee C: line");
        assert_eq!(apply_thee_rule("Take the 8 bus"), "Take thee 8 bus");
    }

    #[test]
    fn test_the_left_alone() {
        assert_eq!(
            apply_thee_rule("The train is late."),
            "The train is late."
        );
        assert_eq!(apply_thee_rule("Mind the gap"), "Mind the gap");
    }

    #[test]
    fn test_thee_preserves_punctuation_and_skips_markers() {
        assert_eq!(apply_thee_rule("going to \\!br the, end"), "going to \\!br thee, end");
        assert_eq!(
            apply_thee_rule("on behalf of the company"),
            "on behalf of thee company"
        );
    }

    #[test]
    fn test_thee_collapses_whitespace() {
        assert_eq!(apply_thee_rule("  in   the   hall "), "in thee hall");
        assert_eq!(apply_thee_rule("   "), "");
    }

    #[test]
    fn test_lead_in_break() {
        assert_eq!(
            apply_lead_in_break("Please proceed to the exit."),
            "Please \\!br proceed to the exit."
        );
        assert_eq!(
            apply_lead_in_break("good evening passengers."),
            "good evening \\!br passengers."
        );
        assert_eq!(
            apply_lead_in_break("This automated train is bound for Central."),
            "This automated train \\!br is bound for Central."
        );
    }

    #[test]
    fn test_lead_in_requires_word_boundary() {
        assert_eq!(apply_lead_in_break("Nowhere to go."), "Nowhere to go.");
        assert_eq!(apply_lead_in_break("The tram is here."), "The tram is here.");
    }
}
