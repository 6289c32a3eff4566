//! VOX 节拍构建
//!
//! 单次从左到右扫描句子 token，按固定顺序的启发式规则插入边界：
//! 1. 专名块（Area/Level/Sector + 编号，或连续 ≥2 个首字母大写词）
//! 2. 两侧均为实词的 "and"
//! 3. 独立破折号（作为硬边界，不朗读）
//! 4. 连接词两侧隔离
//! 5. 系动词 "is" 之前断开
//! 6. 连字符复合词拆分
//! 7. 通用追加：软起始、重词闸门、三拍限制、全轻后重词、重重相邻、逗号/分号后断开

use crate::vox::rules::{
    is_area_head, is_dash_char, is_determiner, is_linker, is_standalone_dash, weight,
};
use crate::vox::tokenizer::{
    is_all_digits, is_single_letter, is_titlecase_word, split_tail, strip_trailing_punct,
    to_lower, tokenize,
};
use crate::vox::types::{is_marker, RunState, Weight, BREAK};

/// 句首前两个 token 内不做前置断开
const HEAD_SPAN: usize = 2;

fn starts_with_closing_punct(token: &str) -> bool {
    matches!(
        token.chars().next(),
        Some('.' | ',' | ';' | ':' | '!' | '?' | ')')
    )
}

fn starts_with_opening_punct(token: &str) -> bool {
    matches!(token.chars().next(), Some('(' | '"' | '\''))
}

/// 构建单句节拍
pub fn build_beats(sentence: &str) -> String {
    let tokens = tokenize(sentence);
    if tokens.is_empty() {
        return String::new();
    }
    BeatBuilder::new(&tokens).build()
}

struct BeatBuilder<'a> {
    tokens: &'a [&'a str],
    out: String,
    run: RunState,
}

impl<'a> BeatBuilder<'a> {
    fn new(tokens: &'a [&'a str]) -> Self {
        Self {
            tokens,
            out: String::new(),
            run: RunState::new(),
        }
    }

    fn build(mut self) -> String {
        let mut i = 0;
        while i < self.tokens.len() {
            i = self.step(i);
        }
        self.out.trim().to_string()
    }

    /// 处理位置 `i`，返回下一个待处理位置
    fn step(&mut self, i: usize) -> usize {
        let token = self.tokens[i];

        // 前序阶段已写入的边界视同本阶段输出
        if token == BREAK {
            self.emit_break();
            return i + 1;
        }
        if is_marker(token) {
            self.append(token);
            return i + 1;
        }

        if let Some(end) = self.proper_noun_run(i) {
            self.emit_run(i, end);
            return end;
        }

        if self.is_joining_and(i) {
            self.emit_break();
            self.append("and");
            self.emit_break();
            return i + 1;
        }

        if is_standalone_dash(token) {
            self.emit_break();
            return i + 1;
        }

        let in_head_span = i < HEAD_SPAN;

        // 对称隔离：[BR] linker [BR]
        if !in_head_span && is_linker(token) {
            self.emit_break();
            self.append(token);
            self.emit_break();
            return i + 1;
        }

        if !in_head_span && self.is_pre_copula(i) {
            self.emit_break();
        }

        if self.emit_dash_split(token) {
            return i + 1;
        }

        self.append_generic(i);
        i + 1
    }

    fn ends_with_break(&self) -> bool {
        self.out
            .strip_suffix(BREAK)
            .map_or(false, |head| head.ends_with(' '))
    }

    /// 输出边界（不重复），并重置运行状态
    fn emit_break(&mut self) {
        if !self.ends_with_break() {
            self.out.push(' ');
            self.out.push_str(BREAK);
        }
        self.run.reset();
    }

    fn append(&mut self, token: &str) {
        if !self.out.is_empty()
            && !starts_with_closing_punct(token)
            && !starts_with_opening_punct(token)
        {
            self.out.push(' ');
        }
        self.out.push_str(token);
    }

    fn prev_content(&self, i: usize) -> Option<&'a str> {
        self.tokens[..i].iter().rev().copied().find(|t| !is_marker(t))
    }

    fn next_content(&self, i: usize) -> Option<&'a str> {
        self.tokens[i + 1..].iter().copied().find(|t| !is_marker(t))
    }

    /// 专名块范围 `[i, end)`
    fn proper_noun_run(&self, i: usize) -> Option<usize> {
        let token = self.tokens[i];

        if is_area_head(token) {
            let extent = self.tokens[i + 1..]
                .iter()
                .take_while(|t| {
                    let bare = strip_trailing_punct(t);
                    is_all_digits(bare) || is_titlecase_word(bare)
                })
                .count();
            if extent > 0 {
                return Some(i + 1 + extent);
            }
        }

        let extent = self.tokens[i..]
            .iter()
            .take_while(|t| is_titlecase_word(strip_trailing_punct(t)))
            .count();
        if extent >= 2 {
            return Some(i + extent);
        }
        None
    }

    fn emit_run(&mut self, start: usize, end: usize) {
        if !self.out.is_empty() && !self.ends_with_break() {
            self.out.push(' ');
            self.out.push_str(BREAK);
        }
        for token in &self.tokens[start..end] {
            if !self.out.is_empty() {
                self.out.push(' ');
            }
            self.out.push_str(token);
            self.out.push(' ');
            self.out.push_str(BREAK);
        }
        self.run.reset();
    }

    fn is_joining_and(&self, i: usize) -> bool {
        if to_lower(strip_trailing_punct(self.tokens[i])) != "and" {
            return false;
        }
        match (self.prev_content(i), self.next_content(i)) {
            (Some(left), Some(right)) => weight(left).is_content() && weight(right).is_content(),
            _ => false,
        }
    }

    /// "is" 后接限定词、专名、数字、单字母或重词
    fn is_pre_copula(&self, i: usize) -> bool {
        if to_lower(strip_trailing_punct(self.tokens[i])) != "is" {
            return false;
        }
        self.next_content(i)
            .map(|next| {
                let bare = strip_trailing_punct(next);
                is_determiner(next)
                    || is_titlecase_word(bare)
                    || is_all_digits(bare)
                    || is_single_letter(next)
                    || weight(next) == Weight::Heavy
            })
            .unwrap_or(false)
    }

    /// 连字符/破折号复合词拆分；尾部标点留在最后一段
    fn emit_dash_split(&mut self, token: &str) -> bool {
        let (core, tail) = split_tail(token);
        let chars: Vec<(usize, char)> = core.char_indices().collect();

        let mut cuts = Vec::new();
        for (k, &(pos, ch)) in chars.iter().enumerate() {
            if !is_dash_char(ch) {
                continue;
            }
            let letter_before = k > 0 && chars[k - 1].1.is_alphabetic();
            let letter_after = k + 1 < chars.len() && chars[k + 1].1.is_alphabetic();
            if !(letter_before && letter_after) {
                return false;
            }
            cuts.push((pos, ch.len_utf8()));
        }
        if cuts.is_empty() {
            return false;
        }

        let mut parts = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for (pos, len) in cuts {
            parts.push(&core[start..pos]);
            start = pos + len;
        }
        parts.push(&core[start..]);

        let last = parts.len() - 1;
        for (n, part) in parts.into_iter().enumerate() {
            if n == last {
                self.append(&format!("{}{}", part, tail));
            } else {
                self.append(part);
            }
            self.emit_break();
        }
        true
    }

    fn has_exempt_predecessor(&self, i: usize) -> bool {
        self.prev_content(i)
            .map(|prev| {
                let bare = strip_trailing_punct(prev);
                is_titlecase_word(bare) || is_all_digits(bare) || is_single_letter(prev)
            })
            .unwrap_or(false)
    }

    fn append_generic(&mut self, i: usize) {
        let token = self.tokens[i];
        let in_head_span = i < HEAD_SPAN;
        let mut w = weight(token);

        // 软起始：句首专名不与下一个专名相连时降为 Medium
        if i == 0 && is_titlecase_word(strip_trailing_punct(token)) {
            let next_is_title = self
                .tokens
                .get(1)
                .map_or(false, |next| is_titlecase_word(strip_trailing_punct(next)));
            if !next_is_title && w == Weight::Heavy {
                w = Weight::Medium;
            }
        }

        if w == Weight::Heavy {
            // 重词闸门
            if self.run.content_run >= 1 && !self.has_exempt_predecessor(i) {
                self.emit_break();
            }
            // 三拍限制
            if self.run.content_run >= 2 {
                self.emit_break();
            }
            // 全轻之后的重词（句首不补边界）
            if self.run.all_light && !in_head_span && !self.out.is_empty() {
                self.emit_break();
            }
            // 重重相邻
            if i > 0 && self.run.prev_weight == Weight::Heavy && !in_head_span {
                self.emit_break();
            }
        }

        self.append(token);

        if token.ends_with(',') || token.ends_with(';') {
            self.emit_break();
            return;
        }

        self.run.record(w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sentence() {
        assert_eq!(build_beats(""), "");
        assert_eq!(build_beats("   "), "");
    }

    #[test]
    fn test_proper_noun_run_and_linker() {
        assert_eq!(
            build_beats("Please \\!br proceed to thee Main Platform."),
            "Please \\!br proceed \\!br to \\!br thee \\!br Main \\!br Platform. \\!br"
        );
    }

    #[test]
    fn test_area_block() {
        assert_eq!(
            build_beats("Proceed to Area 5 now"),
            "Proceed to \\!br Area \\!br 5 \\!br now"
        );
    }

    #[test]
    fn test_heavy_heavy_adjacency() {
        assert_eq!(
            build_beats("We expect 93 percent."),
            "We expect \\!br 93 \\!br percent."
        );
        assert_eq!(build_beats("we hold 42 7"), "we hold \\!br 42 \\!br 7");
    }

    #[test]
    fn test_joining_and() {
        assert_eq!(build_beats("Tea and coffee"), "Tea \\!br and \\!br coffee");
        assert_eq!(
            build_beats("100 \\!br and \\!br 5"),
            "100 \\!br and \\!br 5"
        );
    }

    #[test]
    fn test_joining_and_is_normalized() {
        assert_eq!(build_beats("tea AND coffee"), "tea \\!br and \\!br coffee");
        assert_eq!(build_beats("tea and, coffee"), "tea \\!br and \\!br coffee");
    }

    #[test]
    fn test_and_before_light_word_not_isolated() {
        assert_eq!(build_beats("bread and the jam"), "bread and the jam");
    }

    #[test]
    fn test_standalone_dash_dropped() {
        assert_eq!(
            build_beats("Doors closing - stand clear"),
            "Doors closing \\!br stand clear"
        );
        assert_eq!(
            build_beats("Doors closing \u{2014} stand clear"),
            "Doors closing \\!br stand clear"
        );
    }

    #[test]
    fn test_leading_dash_opens_with_break() {
        assert_eq!(
            build_beats("- Attention all passengers."),
            "\\!br Attention all \\!br passengers."
        );
        assert_eq!(build_beats("\u{2014} now"), "\\!br now");
    }

    #[test]
    fn test_dash_compound_split() {
        assert_eq!(
            build_beats("Take the north-bound line"),
            "Take the north \\!br bound \\!br line"
        );
        assert_eq!(
            build_beats("a well\u{2013}known route."),
            "a well \\!br known \\!br route."
        );
    }

    #[test]
    fn test_dash_without_letters_not_split() {
        // 数字区间不拆分，按重词处理
        assert_eq!(build_beats("open 9-5"), "open \\!br 9-5");
    }

    #[test]
    fn test_comma_boundary() {
        assert_eq!(
            build_beats("Passengers, please wait here"),
            "Passengers, \\!br please wait here"
        );
    }

    #[test]
    fn test_pre_copula_break() {
        assert_eq!(
            build_beats("The next stop is Central Station."),
            "The next stop \\!br is \\!br Central \\!br Station. \\!br"
        );
        assert_eq!(build_beats("This is the end"), "This is the end");
    }

    #[test]
    fn test_heavy_gate_exempt_predecessor() {
        // 专名前驱不触发重词闸门
        assert_eq!(build_beats("Gate 42"), "Gate 42");
        assert_eq!(build_beats("gate 42"), "gate \\!br 42");
    }

    #[test]
    fn test_three_beat_limiter() {
        assert_eq!(build_beats("Gate 42 7"), "Gate 42 \\!br 7");
    }

    #[test]
    fn test_soft_start_downgrade() {
        assert_eq!(
            build_beats("Attention \\!wH1 passengers"),
            "Attention \\!wH1 passengers"
        );
        assert_eq!(
            build_beats("attention \\!wH1 passengers"),
            "attention \\!wH1 \\!br passengers"
        );
    }

    #[test]
    fn test_heavy_after_all_light() {
        assert_eq!(
            build_beats("As the passengers wait"),
            "As the \\!br passengers wait"
        );
    }

    #[test]
    fn test_vendor_tags_pass_through() {
        assert_eq!(build_beats("\\!wH1 hello"), "\\!wH1 hello");
    }
}
