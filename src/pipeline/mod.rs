// Pipeline 模块 - 文本行处理管道
//
// 支持多种韵律模式：
// - Clean: 纯净模式（行内指令 → 片段）
// - Vox / VoxTagged: VOX 韵律标注（可选厂商标签包裹）
//
// 片段进入 SpeechQueue，按播放单元取出后交给 SpeechSink

mod types;
pub mod inline;
mod line;
mod queue;

pub use types::*;
pub use inline::InlineParser;
pub use line::LinePipeline;
pub use queue::SpeechQueue;
