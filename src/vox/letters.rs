//! VOX 字母 token 规范化
//!
//! 边界（句首/句尾或相邻 `\!br` 等标记）旁的孤立大写字母改写为稳定的字母读音 token：
//! `A` / `a` → `Ay:`，其余大写字母 → `X:`（恰好一个冒号）

use crate::vox::tokenizer::{join_tokens, tokenize};
use crate::vox::types::is_marker;

/// 字母 token 拆解结果
struct LetterParts<'a> {
    core: &'a str,
    had_colon: bool,
    /// 冒号之外的尾部标点（保持原顺序）
    punct: String,
}

fn is_peelable(ch: char) -> bool {
    matches!(ch, ',' | '.' | ';' | '!' | '?' | '"' | '\'')
}

/// 剥离尾部标点，最多记下一个冒号
fn peel(token: &str) -> LetterParts<'_> {
    let mut core = token;
    let mut had_colon = false;
    let mut punct: Vec<char> = Vec::new();

    while let Some(ch) = core.chars().next_back() {
        if ch == ':' && !had_colon {
            had_colon = true;
        } else if is_peelable(ch) {
            punct.push(ch);
        } else {
            break;
        }
        core = &core[..core.len() - ch.len_utf8()];
    }

    LetterParts {
        core,
        had_colon,
        punct: punct.into_iter().rev().collect(),
    }
}

fn is_single_uppercase(core: &str) -> bool {
    let mut chars = core.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_alphabetic() && c.is_uppercase(),
        _ => false,
    }
}

fn rewrite(token: &str, near_boundary: bool) -> String {
    let LetterParts {
        core,
        mut had_colon,
        punct,
    } = peel(token);

    let core = if (core == "A" || core == "a") && (near_boundary || had_colon) {
        had_colon = true;
        "Ay"
    } else {
        if is_single_uppercase(core) && near_boundary {
            had_colon = true;
        }
        core
    };

    let mut rebuilt = String::with_capacity(token.len() + 3);
    rebuilt.push_str(core);
    if had_colon {
        rebuilt.push(':');
    }
    rebuilt.push_str(&punct);
    rebuilt
}

/// 规范化单句中的字母 token，结果以单空格拼接
pub fn normalize_letter_tokens(sentence: &str) -> String {
    let tokens = tokenize(sentence);
    if tokens.is_empty() {
        return String::new();
    }

    let is_boundary = |idx: Option<usize>| match idx {
        Some(i) => tokens.get(i).map_or(true, |t| is_marker(t)),
        None => true,
    };

    let rewritten: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if is_marker(token) {
                return token.to_string();
            }
            let near_boundary = is_boundary(i.checked_sub(1)) || is_boundary(Some(i + 1));
            rewrite(token, near_boundary)
        })
        .collect();

    join_tokens(&rewritten)
}
