// 语音输出端
//
// 播放单元的最终去向。真实的语音引擎绑定不在本 crate 内，
// 默认实现把每个播放单元写成一行文本，供下游进程消费

use anyhow::Result;
use std::io::Write;

/// 语音输出端
pub trait SpeechSink: Send {
    /// 输出一个播放单元；`tagged` 表示文本含厂商标签
    fn speak(&mut self, text: &str, tagged: bool) -> Result<()>;
}

/// 每个播放单元写一行
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

/// 写到标准输出
pub type StdoutSink = WriterSink<std::io::Stdout>;

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> SpeechSink for WriterSink<W> {
    fn speak(&mut self, text: &str, tagged: bool) -> Result<()> {
        tracing::debug!("[speak] tagged={} len={}", tagged, text.len());
        writeln!(self.writer, "{}", text)?;
        self.writer.flush()?;
        Ok(())
    }
}
