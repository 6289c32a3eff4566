// 行分发器
//
// 文本行 → LinePipeline → SpeechQueue → SpeechSink
// 网络监听与标准输入两种入口共用

use std::ops::ControlFlow;

use crate::pipeline::{LineCommand, LineOutcome, LinePipeline, SpeechQueue};
use crate::speech_sink::SpeechSink;

pub struct Dispatcher {
    pipeline: LinePipeline,
    queue: SpeechQueue,
    sink: Box<dyn SpeechSink>,
}

impl Dispatcher {
    pub fn new(pipeline: LinePipeline, sink: Box<dyn SpeechSink>) -> Self {
        Self {
            pipeline,
            queue: SpeechQueue::new(),
            sink,
        }
    }

    /// 处理一行输入；收到退出指令时返回 `Break`
    pub fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match self.pipeline.process_line(line) {
            LineOutcome::Command(LineCommand::Stop) => {
                let dropped = self.queue.clear();
                tracing::info!("收到 /stop，已清空 {} 个待播放片段", dropped);
            }
            LineOutcome::Command(LineCommand::Quit) => {
                tracing::info!("收到退出指令");
                return ControlFlow::Break(());
            }
            LineOutcome::Chunks(chunks) => {
                self.queue.extend(chunks);
                self.drain();
            }
        }
        ControlFlow::Continue(())
    }

    /// 依次送出队列中的全部播放单元
    fn drain(&mut self) {
        while let Some(utterance) = self.queue.next_utterance() {
            if let Err(e) = self.sink.speak(&utterance.text, utterance.tagged) {
                tracing::error!("语音输出失败: {}", e);
            }
        }
    }
}
