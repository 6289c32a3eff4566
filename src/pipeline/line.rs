// 行处理管道
//
// 一行输入 → 控制指令，或一组待播放片段：
// - Clean: 行内指令 / [[pause N]] 切分
// - Vox / VoxTagged: 整行经 VOX 韵律标注后作为单个片段

use super::inline::{parse_control, InlineParser};
use super::types::{Chunk, LineOutcome, ProsodyMode};
use crate::vox::{visualize_markup, VoxEngine};

/// 行处理管道
#[derive(Debug, Clone, Copy)]
pub struct LinePipeline {
    mode: ProsodyMode,
    inline: InlineParser,
    engine: VoxEngine,
}

impl LinePipeline {
    pub fn new(mode: ProsodyMode, max_pause_ms: u32) -> Self {
        Self {
            mode,
            inline: InlineParser::new(max_pause_ms),
            engine: VoxEngine::new(mode.wraps_tags()),
        }
    }

    pub fn mode(&self) -> ProsodyMode {
        self.mode
    }

    /// 处理一行输入
    pub fn process_line(&self, line: &str) -> LineOutcome {
        if !self.mode.uses_vox() {
            return self.inline.parse_line(line);
        }

        if let Some(command) = parse_control(line) {
            return LineOutcome::Command(command);
        }

        let out = self.engine.process(line);
        tracing::debug!("[vox] in : {:?}", line);
        tracing::debug!("[vox] out: {:?}", out);
        tracing::debug!("[vox] viz: {:?}", visualize_markup(&out));

        if out.is_empty() {
            LineOutcome::Chunks(Vec::new())
        } else {
            LineOutcome::Chunks(vec![Chunk::new(out)])
        }
    }
}

impl Default for LinePipeline {
    fn default() -> Self {
        Self::new(ProsodyMode::default(), super::inline::DEFAULT_MAX_PAUSE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::LineCommand;

    #[test]
    fn test_clean_mode_uses_inline_parser() {
        let pipeline = LinePipeline::default();
        assert_eq!(pipeline.mode(), ProsodyMode::Clean);
        match pipeline.process_line("Hello there") {
            LineOutcome::Chunks(chunks) => {
                assert_eq!(chunks.len(), 2);
                assert_eq!(chunks[0].text, "Hello there");
                assert!(chunks[1].is_bare_break());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_vox_modes_produce_single_chunk() {
        let plain = LinePipeline::new(ProsodyMode::Vox, 5000);
        match plain.process_line("Mind the gap.") {
            LineOutcome::Chunks(chunks) => {
                assert_eq!(chunks.len(), 1);
                assert!(!chunks[0].text.contains("\\!wH1"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let tagged = LinePipeline::new(ProsodyMode::VoxTagged, 5000);
        match tagged.process_line("Mind the gap.") {
            LineOutcome::Chunks(chunks) => {
                assert_eq!(chunks.len(), 1);
                assert!(chunks[0].text.starts_with("\\!wH1 "));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_vox_mode_empty_line() {
        let pipeline = LinePipeline::new(ProsodyMode::Vox, 5000);
        assert_eq!(pipeline.process_line("   "), LineOutcome::Chunks(Vec::new()));
    }

    #[test]
    fn test_control_commands_in_every_mode() {
        for mode in [ProsodyMode::Clean, ProsodyMode::Vox, ProsodyMode::VoxTagged] {
            let pipeline = LinePipeline::new(mode, 5000);
            assert_eq!(
                pipeline.process_line("/quit"),
                LineOutcome::Command(LineCommand::Quit)
            );
        }
    }
}
