pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod net_server;
pub mod pipeline;
pub mod speech_sink;
pub mod vox;

use anyhow::Result;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::sync::Mutex;

use cli::{help_text, CliOptions, RunMode};
use config::{AppConfig, CONFIG_LOCK};
use dispatcher::Dispatcher;
use net_server::{shutdown_signal, NetServer};
use pipeline::LinePipeline;
use speech_sink::StdoutSink;

pub use vox::{vox_process, VoxEngine};

/// 日志过滤环境变量
pub const LOG_ENV: &str = "NET_VOX_LOG";

/// 初始化日志系统
///
/// 过滤规则取自 `NET_VOX_LOG`，未设置时为 info（`--verbose` 时为 debug）。
/// 日志写到 stderr，stdout 留给播放输出。可安全地多次调用
pub fn init_logging(verbose: bool, log_path: Option<&str>) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("打开日志文件 {} 失败: {}", path, e))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    // 已初始化过时 try_init 返回错误，忽略即可
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init();

    Ok(())
}

/// 读取配置并叠加命令行选项；`--save-config` 时写回配置文件
fn resolve_config(options: &CliOptions) -> (AppConfig, Option<anyhow::Error>) {
    let _guard = CONFIG_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let (mut config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::new(), Some(e)),
    };
    options.apply(&mut config);

    if options.save_config {
        if let Err(e) = config.save() {
            return (config, Some(e));
        }
    }
    (config, load_error)
}

/// 从标准输入逐行读取直到 EOF 或退出指令
fn run_stdin(mut dispatcher: Dispatcher) -> Result<()> {
    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = net_server::decode_line(&buf);
        if let ControlFlow::Break(()) = dispatcher.handle_line(&line) {
            break;
        }
    }
    Ok(())
}

fn run_server(config: &AppConfig, dispatcher: Dispatcher) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = NetServer::bind(&config.server).await?;
        server.run(dispatcher, shutdown_signal()).await
    })
}

pub fn run() -> Result<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.run_mode == RunMode::Help {
        print!("{}", help_text());
        return Ok(());
    }

    let (config, config_error) = resolve_config(&options);
    init_logging(config.verbose, config.log_path.as_deref())?;
    for arg in &options.unknown {
        tracing::warn!("忽略未知参数: {}", arg);
    }
    if let Some(e) = config_error {
        tracing::warn!("配置文件处理失败，使用当前设置继续: {}", e);
    }

    tracing::info!(
        "启动 net-vox: 模式 {}, 停顿上限 {}ms",
        config.prosody_mode.display_name(),
        config.max_pause_ms
    );

    let pipeline = LinePipeline::new(config.prosody_mode, config.max_pause_ms);
    let mut dispatcher = Dispatcher::new(pipeline, Box::new(StdoutSink::stdout()));

    match &options.run_mode {
        RunMode::Say(text) => {
            let _ = dispatcher.handle_line(text);
            Ok(())
        }
        RunMode::Server => run_server(&config, dispatcher),
        RunMode::Stdin => run_stdin(dispatcher),
        RunMode::Help => Ok(()),
    }
}
