// TCP 行监听服务
//
// 每个客户端连接按 `\n` 切行（去掉行尾 `\r`，按 UTF-8 宽松解码），
// 所有行经 mpsc 通道汇入单个分发任务，保证播放顺序

use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;

/// 行通道容量
const LINE_CHANNEL_CAPACITY: usize = 256;

/// 单行最大字节数（含换行符），超出即断开该客户端
const MAX_LINE_BYTES: usize = 64 * 1024;

/// accept 出错后的重试间隔
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct NetServer {
    listener: TcpListener,
}

impl NetServer {
    /// 绑定监听地址
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        config.validate()?;
        let address = config.address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|e| anyhow::anyhow!("监听 {} 失败: {}", address, e))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 运行直到收到退出指令或 `shutdown` 完成
    pub async fn run<F>(self, mut dispatcher: Dispatcher, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!("[net] 正在监听 {}", addr);

        let (tx, mut rx) = mpsc::channel::<String>(LINE_CHANNEL_CAPACITY);
        let accept_task = tokio::spawn(accept_loop(self.listener, tx));

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else {
                        tracing::warn!("[net] 行通道已关闭");
                        break;
                    };
                    if let ControlFlow::Break(()) = dispatcher.handle_line(&line) {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("[net] 收到关闭信号");
                    break;
                }
            }
        }

        accept_task.abort();
        tracing::info!("[net] 服务已停止");
        Ok(())
    }
}

async fn accept_loop(listener: TcpListener, tx: mpsc::Sender<String>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::info!("[net] 客户端已连接: {}", peer);
                tokio::spawn(handle_client(stream, peer, tx.clone()));
            }
            Err(e) => {
                tracing::warn!("[net] accept 失败: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

async fn handle_client(stream: TcpStream, peer: SocketAddr, tx: mpsc::Sender<String>) {
    read_lines(BufReader::new(stream), peer, &tx, MAX_LINE_BYTES).await;
    tracing::info!("[net] 客户端已断开: {}", peer);
}

/// 逐行读取并转发；残余的未结束数据或超长行会结束读取
async fn read_lines<R>(
    mut reader: R,
    peer: SocketAddr,
    tx: &mpsc::Sender<String>,
    max_len: usize,
) where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        let mut limited = (&mut reader).take(max_len as u64);
        match limited.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if buf.last() != Some(&b'\n') {
                    if buf.len() >= max_len {
                        tracing::warn!("[net] {} 发送的行超过 {} 字节，断开", peer, max_len);
                    } else {
                        tracing::debug!("[net] 丢弃未结束的行 ({} 字节)", buf.len());
                    }
                    break;
                }
                if tx.send(decode_line(&buf)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("[net] 读取 {} 失败: {}", peer, e);
                break;
            }
        }
    }
}

/// 去掉 `\n` 与行尾 `\r`，宽松解码
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// 等待 Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("安装 Ctrl+C 处理器失败: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到 Ctrl+C，准备退出");
}
