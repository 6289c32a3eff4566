//! VOX 处理引擎
//!
//! 分句后逐句执行：thee 改写 → 开场短语断开 → 数字/时间 → 节拍 → 字母 token → 整理，
//! 最后拼接并按需包裹厂商标签

use crate::vox::beats::build_beats;
use crate::vox::format::{finalize, tidy, with_cadence};
use crate::vox::letters::normalize_letter_tokens;
use crate::vox::lexical::{apply_lead_in_break, apply_thee_rule};
use crate::vox::numeric::apply_numeric_rules;
use crate::vox::tokenizer::split_sentences;

/// VOX 韵律引擎
///
/// 无内部可变状态，可在任意线程并发使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoxEngine {
    /// 输出是否包裹 `\!wH1 ... \!wH0`
    pub wrap_tags: bool,
}

impl VoxEngine {
    pub fn new(wrap_tags: bool) -> Self {
        Self { wrap_tags }
    }

    /// 处理一行文本
    pub fn process(&self, text: &str) -> String {
        let sentences: Vec<String> = split_sentences(text)
            .map(process_sentence)
            .map(|s| with_cadence(&s))
            .collect();

        let out = finalize(&sentences.join(" "), self.wrap_tags);
        tracing::trace!("VOX 处理: {} 句, 输出 {} 字节", sentences.len(), out.len());
        out
    }
}

fn process_sentence(sentence: &str) -> String {
    let text = apply_thee_rule(sentence);
    let text = apply_lead_in_break(&text);
    let text = apply_numeric_rules(&text);
    let text = build_beats(&text);
    let text = normalize_letter_tokens(&text);
    tidy(&text)
}

/// 将一行文本转换为带韵律标记的输出
pub fn vox_process(text: &str, wrap_vox_tags: bool) -> String {
    VoxEngine::new(wrap_vox_tags).process(text)
}
