// 命令行参数
//
// 手工解析，未识别的参数收集后由调用方记录警告

use anyhow::Result;

use crate::config::AppConfig;
use crate::pipeline::ProsodyMode;

/// 运行方式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    /// 从标准输入逐行读取，直到 EOF
    #[default]
    Stdin,
    /// 启动 TCP 行监听
    Server,
    /// 转换一行文本后退出
    Say(String),
    /// 打印帮助后退出
    Help,
}

/// 解析后的命令行选项（为 None 的项沿用配置文件）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub run_mode: RunMode,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub prosody_mode: Option<ProsodyMode>,
    pub verbose: bool,
    pub log_path: Option<String>,
    /// 将叠加后的设置写回配置文件
    pub save_config: bool,
    /// 未识别的参数（日志初始化后再报告）
    pub unknown: Vec<String>,
}

fn take_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("参数 {} 缺少取值", flag))
}

impl CliOptions {
    /// 解析参数（不含程序名）
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => options.run_mode = RunMode::Help,
                "--startserver" | "--headless" => {
                    if options.run_mode == RunMode::Stdin {
                        options.run_mode = RunMode::Server;
                    }
                }
                "--vox" => options.prosody_mode = Some(ProsodyMode::VoxTagged),
                "--voxclean" => options.prosody_mode = Some(ProsodyMode::Vox),
                "--verbose" => options.verbose = true,
                "--save-config" => options.save_config = true,
                "--host" => options.host = Some(take_value(&mut args, "--host")?),
                "--port" => {
                    let value = take_value(&mut args, "--port")?;
                    let port = value
                        .parse::<u16>()
                        .map_err(|e| anyhow::anyhow!("无效端口 {:?}: {}", value, e))?;
                    options.port = Some(port);
                }
                "--log" => options.log_path = Some(take_value(&mut args, "--log")?),
                "--say" => {
                    let text = take_value(&mut args, "--say")?;
                    if options.run_mode != RunMode::Help {
                        options.run_mode = RunMode::Say(text);
                    }
                }
                _ => options.unknown.push(arg),
            }
        }

        Ok(options)
    }

    /// 命令行覆盖配置项（仅本次运行）
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(mode) = self.prosody_mode {
            config.prosody_mode = mode;
        }
        if self.verbose {
            config.verbose = true;
        }
        if let Some(path) = &self.log_path {
            config.log_path = Some(path.clone());
        }
    }
}

pub fn help_text() -> String {
    const LINES: &[&str] = &[
        "Usage: net-vox [--startserver | --headless] [--host HOST] [--port N]",
        "               [--vox | --voxclean] [--verbose] [--log PATH]",
        "               [--say TEXT] [--save-config] [--help]",
        "",
        "Options:",
        "  --startserver        Start the TCP line listener",
        "  --headless           Same as --startserver",
        "  --host HOST          TCP host to bind (default 127.0.0.1)",
        "  --port N             TCP port (default 5555)",
        "  --vox                VOX prosody, wrapped with \\!wH1 .. \\!wH0",
        "  --voxclean           VOX prosody without the \\!wH1/\\!wH0 wrap",
        "  --verbose            Debug logging (includes [vox] in/out/viz lines)",
        "  --log PATH           Also write logs to PATH",
        "  --say TEXT           Transform TEXT, print the utterances and exit",
        "  --save-config        Persist the options above to the config file",
        "  --help               Show this help and exit",
        "",
        "Without --startserver, lines are read from stdin until EOF.",
        "",
        "Vendor tags:",
        "  \\!wH1 / \\!wH0       Enable/disable VOX prosody",
        "  \\!sfN               Final pause of N cs (e.g. 500 -> \\!sf500)",
        "  \\!R#                Rate scale (smaller = faster)",
        "  \\!%#                Pitch scale (0.70..1.30)",
        "  \\!br                Explicit boundary",
        "",
        "Line commands:",
        "  /rate N              Rate 0..100 (maps to \\!R2.00 .. \\!R0.10)",
        "  /pitch N             Pitch 0..100 (maps to \\!%0.70 .. \\!%1.30)",
        "  /pause MS            Pause tag (500 -> \\!sf50) plus boundary",
        "  /stop                Drop pending speech",
        "  /quit | /exit        Shut down",
        "",
        "Inline markup:",
        "  [[pause MS]]         In-band pause (\\!sfN plus \\!br)",
        "",
        "Notes:",
        "  * In VOX modes each sentence ends with \\!sf500 and a boundary.",
        "  * Config file: <config dir>/NetVox/config.json",
    ];
    let mut out = LINES.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.run_mode, RunMode::Stdin);
    }

    #[test]
    fn test_server_flags() {
        let options = parse(&["--startserver", "--host", "0.0.0.0", "--port", "6000"]).unwrap();
        assert_eq!(options.run_mode, RunMode::Server);
        assert_eq!(options.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(options.port, Some(6000));

        assert_eq!(parse(&["--headless"]).unwrap().run_mode, RunMode::Server);
    }

    #[test]
    fn test_vox_flags() {
        assert_eq!(
            parse(&["--vox"]).unwrap().prosody_mode,
            Some(ProsodyMode::VoxTagged)
        );
        assert_eq!(
            parse(&["--voxclean"]).unwrap().prosody_mode,
            Some(ProsodyMode::Vox)
        );
    }

    #[test]
    fn test_say_and_help() {
        let options = parse(&["--say", "Hello there.", "--verbose"]).unwrap();
        assert_eq!(options.run_mode, RunMode::Say("Hello there.".to_string()));
        assert!(options.verbose);
        assert!(!options.save_config);
        assert!(parse(&["--save-config"]).unwrap().save_config);

        assert_eq!(parse(&["--help", "--say", "x"]).unwrap().run_mode, RunMode::Help);
    }

    #[test]
    fn test_unknown_arguments_collected() {
        let options = parse(&["--gui", "--vox", "extra"]).unwrap();
        assert_eq!(options.unknown, vec!["--gui", "extra"]);
        assert_eq!(options.prosody_mode, Some(ProsodyMode::VoxTagged));
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse(&["--port", "abc"]).is_err());
        assert!(parse(&["--port"]).is_err());
        assert!(parse(&["--log"]).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut config = AppConfig::new();
        let options = parse(&["--port", "7000", "--voxclean", "--log", "out.log"]).unwrap();
        options.apply(&mut config);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.prosody_mode, ProsodyMode::Vox);
        assert_eq!(config.log_path.as_deref(), Some("out.log"));
    }

    #[test]
    fn test_help_mentions_tags() {
        let help = help_text();
        assert!(help.contains("--voxclean"));
        assert!(help.contains("\\!wH1"));
    }
}
