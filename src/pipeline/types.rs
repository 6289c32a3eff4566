// Pipeline 核心类型定义
//
// 定义了行处理管道所需的类型，包括：
// - 韵律模式 (ProsodyMode)
// - 待播放片段 (Chunk)
// - 合并后的播放单元 (Utterance)
// - 行内控制指令 (LineCommand)

use serde::{Deserialize, Serialize};

/// 韵律处理模式
///
/// 决定收到的文本行如何被转换后送入播放队列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProsodyMode {
    /// 纯净模式：仅解析行内指令（/rate、[[pause N]] 等）
    #[default]
    Clean,
    /// VOX 模式：韵律标注，不包裹厂商标签
    Vox,
    /// VOX 模式：韵律标注并包裹 `\!wH1 ... \!wH0`
    VoxTagged,
}

impl ProsodyMode {
    /// 获取模式的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ProsodyMode::Clean => "纯净模式",
            ProsodyMode::Vox => "VOX",
            ProsodyMode::VoxTagged => "VOX（带标签）",
        }
    }

    /// 是否经过 VOX 韵律标注
    pub fn uses_vox(&self) -> bool {
        !matches!(self, ProsodyMode::Clean)
    }

    /// VOX 输出是否包裹厂商标签
    pub fn wraps_tags(&self) -> bool {
        matches!(self, ProsodyMode::VoxTagged)
    }
}

/// 队列中的单个文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 是否仅包含一个 `\!br`（忽略空格与制表符）
    pub fn is_bare_break(&self) -> bool {
        self.text.trim_matches(|c| c == ' ' || c == '\t') == crate::vox::BREAK
    }
}

/// 一次送往语音引擎的播放单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// 是否含有厂商标签（`\!` 序列）
    pub tagged: bool,
}

impl Utterance {
    pub fn new(text: String) -> Self {
        let tagged = text_looks_tagged(&text);
        Self { text, tagged }
    }
}

/// 文本中是否含有厂商标签
pub fn text_looks_tagged(text: &str) -> bool {
    text.contains("\\!")
}

/// 行级控制指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommand {
    /// 清空待播放队列
    Stop,
    /// 关闭服务/程序
    Quit,
}

/// 一行输入的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// 产出若干片段
    Chunks(Vec<Chunk>),
    /// 控制指令
    Command(LineCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prosody_mode_serde() {
        let json = serde_json::to_string(&ProsodyMode::VoxTagged).unwrap();
        assert_eq!(json, "\"vox_tagged\"");
        let mode: ProsodyMode = serde_json::from_str("\"vox\"").unwrap();
        assert_eq!(mode, ProsodyMode::Vox);
        assert_eq!(ProsodyMode::default(), ProsodyMode::Clean);
    }

    #[test]
    fn test_prosody_mode_flags() {
        assert!(!ProsodyMode::Clean.uses_vox());
        assert!(ProsodyMode::Vox.uses_vox());
        assert!(!ProsodyMode::Vox.wraps_tags());
        assert!(ProsodyMode::VoxTagged.wraps_tags());
    }

    #[test]
    fn test_bare_break_chunk() {
        assert!(Chunk::new(" \\!br ").is_bare_break());
        assert!(Chunk::new("\t\\!br").is_bare_break());
        assert!(!Chunk::new(" \\!sf50  \\!br ").is_bare_break());
        assert!(!Chunk::new("\\!br\n").is_bare_break());
    }

    #[test]
    fn test_utterance_tagged() {
        assert!(Utterance::new("Hello \\!br".to_string()).tagged);
        assert!(!Utterance::new("Hello".to_string()).tagged);
    }
}
