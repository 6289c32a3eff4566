//! VOX 数字与时间规范化
//!
//! 按固定顺序做整串替换，后面的规则会处理前面规则的产出：
//! 1. 12 小时制时间 → 时 / 分 / Ay: 或 P: / M:
//! 2. "the time is N" → 数字前断开
//! 3. "HH00 hours" → HH / hundred / hours
//! 4. 非整百三位数 → X00 / and / 余数
//! 5. "N degrees" → N / degrees /
//! 6. 清理 "M:" 后残留的句点

use regex::{Captures, Regex};

use crate::vox::types::BREAK;

lazy_static::lazy_static! {
    static ref CLOCK_12H: Regex = Regex::new(
        r"(?i)\b([0-9]{1,2})[:.]([0-9]{2})\s*((?:A\.?M\.?)|(?:P\.?M\.?))(?:\.)?\b",
    )
    .expect("12h clock pattern");
    static ref TIME_IS: Regex =
        Regex::new(r"(\b[Tt]he\s+time\s+is)\s+([0-9]+)").expect("time-is pattern");
    static ref HUNDRED_HOURS: Regex =
        Regex::new(r"(?i)\b([0-9]{2})00\s+hours\b").expect("hundred hours pattern");
    static ref THREE_DIGITS: Regex =
        Regex::new(r"\b([1-9])([0-9])([0-9])\b").expect("three digit pattern");
    static ref DEGREES: Regex =
        Regex::new(r"(?i)\b([0-9]+)\s+degrees\b").expect("degrees pattern");
    static ref MERIDIEM_DOT: Regex = Regex::new(r"M:\s*\.").expect("meridiem dot pattern");
}

/// 依序执行全部数字/时间规则
pub fn apply_numeric_rules(sentence: &str) -> String {
    let text = expand_clock_times(sentence);
    let text = break_before_time_value(&text);
    let text = expand_hundred_hours(&text);
    let text = decompose_three_digits(&text);
    let text = expand_degrees(&text);
    strip_meridiem_dot(&text)
}

/// 8:47 AM → `8 \!br 47 \!br Ay: \!br M:`
fn expand_clock_times(text: &str) -> String {
    CLOCK_12H
        .replace_all(text, |caps: &Captures<'_>| {
            let meridiem = if caps[3].to_ascii_lowercase().starts_with('p') {
                "P:"
            } else {
                "Ay:"
            };
            format!(
                "{hour} {br} {minute} {br} {meridiem} {br} M:",
                hour = &caps[1],
                minute = &caps[2],
                br = BREAK,
                meridiem = meridiem,
            )
        })
        .into_owned()
}

/// "The time is 8" → 数字前断开
fn break_before_time_value(text: &str) -> String {
    TIME_IS
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{} {} {}", &caps[1], BREAK, &caps[2])
        })
        .into_owned()
}

/// 1400 hours → `14 \!br hundred \!br hours`
fn expand_hundred_hours(text: &str) -> String {
    HUNDRED_HOURS
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{} {br} hundred {br} hours", &caps[1], br = BREAK)
        })
        .into_owned()
}

/// 105 → `100 \!br and \!br 5`；整百数保持原样
fn decompose_three_digits(text: &str) -> String {
    THREE_DIGITS
        .replace_all(text, |caps: &Captures<'_>| {
            let tail = format!("{}{}", &caps[2], &caps[3]);
            if tail == "00" {
                return caps[0].to_string();
            }
            let remainder = tail.trim_start_matches('0');
            format!(
                "{}00 {br} and {br} {}",
                &caps[1],
                if remainder.is_empty() { tail.as_str() } else { remainder },
                br = BREAK
            )
        })
        .into_owned()
}

/// 93 degrees → `93 \!br degrees \!br`
fn expand_degrees(text: &str) -> String {
    DEGREES
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{} {br} degrees {br}", &caps[1], br = BREAK)
        })
        .into_owned()
}

/// "M:." → "M:"
fn strip_meridiem_dot(text: &str) -> String {
    MERIDIEM_DOT.replace_all(text, "M:").into_owned()
}
