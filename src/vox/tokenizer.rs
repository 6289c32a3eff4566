//! VOX 分句与分词
//!
//! 分句按 `.` `!` `?` 切分（紧随其后的引号归入同一句；`\!` 形式的
//! 标记不算句末），分词按空白切分，标点保留在 token 上

/// 句末终止符
fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// 句末之后仍归属本句的闭合引号
fn is_closing_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

/// 可从 token 尾部剥离的标点
pub fn is_trailing_punct(ch: char) -> bool {
    matches!(ch, ',' | '.' | ';' | ':' | '!' | '?' | '"' | '\'')
}

/// 惰性分句迭代器
///
/// 可 `clone()` 后重新遍历；只产出修剪后的非空句子
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if self.rest.is_empty() {
                return None;
            }

            let mut end = None;
            let mut prev = None;
            for (idx, ch) in self.rest.char_indices() {
                let escaped = ch == '!' && prev == Some('\\');
                prev = Some(ch);
                if is_terminator(ch) && !escaped {
                    let mut stop = idx + ch.len_utf8();
                    for (qidx, q) in self.rest[stop..].char_indices() {
                        if !is_closing_quote(q) {
                            break;
                        }
                        stop = idx + ch.len_utf8() + qidx + q.len_utf8();
                    }
                    end = Some(stop);
                    break;
                }
            }

            // 没有终止符：剩余片段作为最后一句
            let stop = end.unwrap_or(self.rest.len());
            let sentence = self.rest[..stop].trim();
            self.rest = &self.rest[stop..];

            if !sentence.is_empty() {
                return Some(sentence);
            }
        }
    }
}

/// 分句
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

/// 按空白分词
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// 以单个空格重新拼接 token
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token.as_ref());
    }
    out
}

/// 拆分尾部标点，返回 (核心, 尾部标点)
pub fn split_tail(token: &str) -> (&str, &str) {
    let core = token.trim_end_matches(is_trailing_punct);
    (core, &token[core.len()..])
}

/// 去掉尾部标点
pub fn strip_trailing_punct(token: &str) -> &str {
    split_tail(token).0
}

/// 小写化（逐字符）
pub fn to_lower(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// 非空且全部为数字
pub fn is_all_digits(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

/// 首字母为大写字母
pub fn is_titlecase_word(word: &str) -> bool {
    word.chars()
        .next()
        .map(|c| c.is_alphabetic() && c.is_uppercase())
        .unwrap_or(false)
}

/// 单个大写字母，形如 `C` 或 `C:`（忽略其他尾部标点）
pub fn is_single_letter(token: &str) -> bool {
    let bare = strip_trailing_punct(token);
    let mut chars = bare.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None) => c.is_alphabetic() && c.is_uppercase(),
        (Some(c), Some(':'), None) => c.is_alphabetic() && c.is_uppercase(),
        _ => false,
    }
}
