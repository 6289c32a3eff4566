// 行内指令解析（纯净模式）
//
// 支持的写法：
// - `/rate N`   语速（0..100）→ ` \!R{scale} ` + 边界
// - `/pitch N`  音高（0..100）→ ` \!%{scale} ` + 边界
// - `/pause N`  停顿毫秒 → ` \!sf{cs}  \!br `
// - `/stop`、`/quit`、`/exit` 控制指令
// - `[[pause N]]` 行内停顿，切分文本为多个片段
//
// 未知指令或缺少数字的指令按普通文本朗读

use super::types::{Chunk, LineCommand, LineOutcome};
use crate::vox::types::{pause_directive, BREAK};

/// 默认最大停顿（毫秒）
pub const DEFAULT_MAX_PAUSE_MS: u32 = 5000;

const PAUSE_OPEN: &str = "[[pause";
const PAUSE_CLOSE: &str = "]]";

/// 行内指令解析器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineParser {
    /// 停顿上限（毫秒）
    pub max_pause_ms: u32,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self {
            max_pause_ms: DEFAULT_MAX_PAUSE_MS,
        }
    }
}

/// 边界片段
fn break_chunk() -> Chunk {
    Chunk::new(format!(" {} ", BREAK))
}

/// 读取开头的十进制数字（不含符号），无数字返回 None
fn leading_number(text: &str) -> Option<u32> {
    let digits: &str = &text[..text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len())];
    if digits.is_empty() {
        return None;
    }
    Some(digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    }))
}

/// 解析 `[[pause N]]` 内的数值；允许前导空白与符号，无法解析视为 0
fn pause_argument(inside: &str) -> i64 {
    let arg = inside.strip_prefix("pause").unwrap_or(inside).trim_start();
    let (negative, rest) = match arg.chars().next() {
        Some('-') => (true, &arg[1..]),
        Some('+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    match leading_number(rest) {
        Some(value) if negative => -i64::from(value),
        Some(value) => i64::from(value),
        None => 0,
    }
}

/// 非空文本片段后跟一个边界
fn push_text(chunks: &mut Vec<Chunk>, text: &str) {
    if !text.is_empty() {
        chunks.push(Chunk::new(text));
        chunks.push(break_chunk());
    }
}

/// 0..100 百分比夹取后的比例
fn percent(value: u32) -> f64 {
    f64::from(value.min(100)) / 100.0
}

/// 语速倍率：0 → 2.00，100 → 0.10
pub fn rate_scale(value: u32) -> f64 {
    2.0 - 1.9 * percent(value)
}

/// 音高倍率：0 → 0.70，100 → 1.30
pub fn pitch_scale(value: u32) -> f64 {
    0.70 + 0.60 * percent(value)
}

impl InlineParser {
    pub fn new(max_pause_ms: u32) -> Self {
        Self { max_pause_ms }
    }

    /// 毫秒 → 厂商停顿单位（厘秒，四舍五入）
    pub fn pause_units(&self, ms: i64) -> u32 {
        let clamped = ms.clamp(0, i64::from(self.max_pause_ms));
        // clamped 已落在 u32 范围内
        ((clamped + 5) / 10) as u32
    }

    /// 解析一行输入
    pub fn parse_line(&self, line: &str) -> LineOutcome {
        if let Some(command) = parse_control(line) {
            return LineOutcome::Command(command);
        }
        match self.slash_command(line) {
            Some(chunks) => LineOutcome::Chunks(chunks),
            None => LineOutcome::Chunks(self.expand_inline_pauses(line)),
        }
    }

    /// `/rate`、`/pitch`、`/pause`；关键字缺少数字时返回 None
    fn slash_command(&self, line: &str) -> Option<Vec<Chunk>> {
        let (keyword, rest) = split_slash_keyword(line)?;
        let value = leading_number(rest.trim_start())?;

        match keyword.as_str() {
            "rate" => Some(vec![
                Chunk::new(format!(" \\!R{:.2} ", rate_scale(value))),
                break_chunk(),
            ]),
            "pitch" => Some(vec![
                Chunk::new(format!(" \\!%{:.2} ", pitch_scale(value))),
                break_chunk(),
            ]),
            "pause" => {
                let units = self.pause_units(i64::from(value));
                Some(vec![Chunk::new(format!(
                    " {}  {} ",
                    pause_directive(units),
                    BREAK
                ))])
            }
            _ => None,
        }
    }

    /// 按 `[[pause N]]` 切分：文本片段后跟边界，停顿指令后跟边界
    ///
    /// 未闭合的 `[[pause` 丢弃其后的全部内容
    pub fn expand_inline_pauses(&self, line: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut rest = line;
        while !rest.is_empty() {
            let Some(open) = rest.find(PAUSE_OPEN) else {
                push_text(&mut chunks, rest);
                break;
            };
            push_text(&mut chunks, &rest[..open]);

            let Some(close) = rest[open..].find(PAUSE_CLOSE).map(|c| open + c) else {
                tracing::debug!("未闭合的 [[pause 指令，忽略行尾: {:?}", &rest[open..]);
                break;
            };
            let inside = &rest[open + 2..close];
            let units = self.pause_units(pause_argument(inside));
            chunks.push(Chunk::new(format!(" {} ", pause_directive(units))));
            chunks.push(break_chunk());
            rest = &rest[close + PAUSE_CLOSE.len()..];
        }
        chunks
    }
}

/// 拆出 `/keyword` 与其后的剩余文本，关键字转小写
fn split_slash_keyword(line: &str) -> Option<(String, &str)> {
    let body = line.trim_start().strip_prefix('/')?;
    let end = body.find(char::is_whitespace).unwrap_or(body.len());
    Some((body[..end].to_lowercase(), &body[end..]))
}

/// 控制指令：`/stop`、`/quit`、`/exit`（整行仅含该关键字）
pub fn parse_control(line: &str) -> Option<LineCommand> {
    let (keyword, rest) = split_slash_keyword(line)?;
    if !rest.trim().is_empty() {
        return None;
    }
    match keyword.as_str() {
        "stop" => Some(LineCommand::Stop),
        "quit" | "exit" => Some(LineCommand::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(outcome: LineOutcome) -> Vec<String> {
        match outcome {
            LineOutcome::Chunks(chunks) => chunks.into_iter().map(|c| c.text).collect(),
            LineOutcome::Command(cmd) => panic!("unexpected command {:?}", cmd),
        }
    }

    #[test]
    fn test_rate_command() {
        let parser = InlineParser::default();
        assert_eq!(
            texts(parser.parse_line("/rate 50")),
            vec![" \\!R1.05 ", " \\!br "]
        );
        assert_eq!(texts(parser.parse_line("  /RATE 0")), vec![" \\!R2.00 ", " \\!br "]);
        // 超过 100 按 100 处理
        assert_eq!(texts(parser.parse_line("/rate 250")), vec![" \\!R0.10 ", " \\!br "]);
    }

    #[test]
    fn test_pitch_command() {
        let parser = InlineParser::default();
        assert_eq!(
            texts(parser.parse_line("/pitch 50")),
            vec![" \\!%1.00 ", " \\!br "]
        );
        assert_eq!(texts(parser.parse_line("/pitch 100")), vec![" \\!%1.30 ", " \\!br "]);
    }

    #[test]
    fn test_pause_command() {
        let parser = InlineParser::default();
        assert_eq!(texts(parser.parse_line("/pause 500")), vec![" \\!sf50  \\!br "]);
        assert_eq!(texts(parser.parse_line("/pause 99999")), vec![" \\!sf500  \\!br "]);
        assert_eq!(texts(parser.parse_line("/pause 4")), vec![" \\!sf0  \\!br "]);
        assert_eq!(texts(parser.parse_line("/pause 5")), vec![" \\!sf1  \\!br "]);
    }

    #[test]
    fn test_keyword_without_number_is_spoken() {
        let parser = InlineParser::default();
        assert_eq!(texts(parser.parse_line("/rate fast")), vec!["/rate fast", " \\!br "]);
        assert_eq!(texts(parser.parse_line("/hello 5")), vec!["/hello 5", " \\!br "]);
    }

    #[test]
    fn test_control_commands() {
        let parser = InlineParser::default();
        assert_eq!(parser.parse_line("/stop"), LineOutcome::Command(LineCommand::Stop));
        assert_eq!(parser.parse_line(" /Quit "), LineOutcome::Command(LineCommand::Quit));
        assert_eq!(parser.parse_line("/exit"), LineOutcome::Command(LineCommand::Quit));
        assert_eq!(parse_control("/stop now"), None);
    }

    #[test]
    fn test_inline_pause_split() {
        let parser = InlineParser::default();
        assert_eq!(
            texts(parser.parse_line("Hello [[pause 500]] world")),
            vec!["Hello ", " \\!br ", " \\!sf50 ", " \\!br ", " world", " \\!br "]
        );
    }

    #[test]
    fn test_inline_pause_edge_cases() {
        let parser = InlineParser::default();
        // 无法解析的数值视为 0
        assert_eq!(
            texts(parser.parse_line("[[pause x]]Go")),
            vec![" \\!sf0 ", " \\!br ", "Go", " \\!br "]
        );
        // 负数夹取为 0
        assert_eq!(
            texts(parser.parse_line("[[pause -20]]")),
            vec![" \\!sf0 ", " \\!br "]
        );
        // 未闭合丢弃剩余部分
        assert_eq!(
            texts(parser.parse_line("Before [[pause 300 after")),
            vec!["Before ", " \\!br "]
        );
        assert!(texts(parser.parse_line("")).is_empty());
    }

    #[test]
    fn test_custom_max_pause() {
        let parser = InlineParser::new(1000);
        assert_eq!(texts(parser.parse_line("/pause 3000")), vec![" \\!sf100  \\!br "]);
    }
}
