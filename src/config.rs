// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::pipeline::inline::DEFAULT_MAX_PAUSE_MS;
use crate::pipeline::ProsodyMode;

// ============================================================================
// 全局配置操作锁
// ============================================================================

lazy_static::lazy_static! {
    /// 全局配置操作锁
    ///
    /// 保护所有 config 的读写操作，防止并发 load->modify->save 导致的数据丢失
    ///
    /// 使用方式：
    /// ```ignore
    /// let _guard = CONFIG_LOCK.lock().unwrap();
    /// let mut config = AppConfig::load()?;
    /// // 修改 config...
    /// config.save()?;
    /// ```
    pub static ref CONFIG_LOCK: Mutex<()> = Mutex::new(());
}

// ============================================================================
// 网络监听配置
// ============================================================================

/// TCP 行监听配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5555
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` 形式的监听地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("监听地址不能为空");
        }
        if self.port == 0 {
            anyhow::bail!("监听端口不能为 0");
        }
        Ok(())
    }
}

// ============================================================================
// 应用配置
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub prosody_mode: ProsodyMode,
    #[serde(default)]
    pub verbose: bool,
    /// 日志文件路径（为空时仅输出到终端）
    #[serde(default)]
    pub log_path: Option<String>,
    /// 停顿指令上限（毫秒）
    #[serde(default = "default_max_pause_ms")]
    pub max_pause_ms: u32,
}

fn default_max_pause_ms() -> u32 {
    DEFAULT_MAX_PAUSE_MS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            server: ServerConfig::default(),
            prosody_mode: ProsodyMode::default(),
            verbose: false,
            log_path: None,
            max_pause_ms: default_max_pause_ms(),
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        let app_dir = config_dir.join("NetVox");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// 从指定路径加载；文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        if !path.exists() {
            tracing::warn!("配置文件不存在，返回默认配置");
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            tracing::error!("解析配置失败: {}", e);
            anyhow::anyhow!("解析配置文件 {:?} 失败: {}", path, e)
        })?;
        config.server.validate()?;

        tracing::info!("配置加载成功");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// 原子写入：先写 `.tmp`，旧文件挪到 `.bak`，替换成功后删除备份
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .map_err(|e| anyhow::anyhow!("写入临时配置 {:?} 失败: {}", temp_path, e))?;

        let backup = match Self::move_to_backup(path) {
            Ok(backup) => backup,
            Err(e) => {
                let _ = std::fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::rename(&temp_path, path) {
            tracing::error!("替换配置文件失败: {}", e);
            let _ = std::fs::remove_file(&temp_path);
            if let Some(backup) = &backup {
                if let Err(restore_err) = std::fs::rename(backup, path) {
                    tracing::error!("恢复备份 {:?} 失败: {}", backup, restore_err);
                }
            }
            return Err(e.into());
        }

        if let Some(backup) = backup {
            let _ = std::fs::remove_file(backup);
        }
        tracing::info!("配置已保存到 {:?}", path);
        Ok(())
    }

    /// 已有配置文件时改名为 `.bak`，返回备份路径
    fn move_to_backup(path: &Path) -> Result<Option<PathBuf>> {
        if !path.exists() {
            return Ok(None);
        }
        let backup = path.with_extension("json.bak");
        if backup.exists() {
            std::fs::remove_file(&backup)?;
        }
        std::fs::rename(path, &backup)
            .map_err(|e| anyhow::anyhow!("备份旧配置 {:?} 失败: {}", path, e))?;
        Ok(Some(backup))
    }
}
