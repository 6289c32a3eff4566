// 播放队列
//
// 先进先出保存待播放片段；取出时若下一个片段只是一个 `\!br`，
// 则合并到同一次播放中，使锚定在边界上的厂商停顿正常生效

use std::collections::VecDeque;

use super::types::{Chunk, Utterance};

/// 待播放片段队列
#[derive(Debug, Default)]
pub struct SpeechQueue {
    chunks: VecDeque<Chunk>,
}

impl SpeechQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push_back(chunk);
    }

    pub fn extend<I: IntoIterator<Item = Chunk>>(&mut self, chunks: I) {
        self.chunks.extend(chunks);
    }

    /// 清空队列，返回丢弃的片段数
    pub fn clear(&mut self) -> usize {
        let dropped = self.chunks.len();
        self.chunks.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// 取出一个播放单元
    pub fn next_utterance(&mut self) -> Option<Utterance> {
        let mut text = self.chunks.pop_front()?.text;

        if self.chunks.front().map_or(false, Chunk::is_bare_break) {
            if let Some(glued) = self.chunks.pop_front() {
                text.push_str(&glued.text);
            }
        }

        Some(Utterance::new(text))
    }
}
