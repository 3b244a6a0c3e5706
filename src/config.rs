use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::{Result, RuprobeError};

/// 配置文件中的探测默认值
///
/// 所有字段都可选，缺省时由 CLI 参数或内置默认值补齐。
/// CLI 参数优先于配置文件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// 附加到每个请求的请求头
    pub headers: HashMap<String, String>,
    /// 认证模式（none/bearer/basic/api-key）
    pub auth: Option<String>,
    /// 认证凭据，支持 ${VAR} 环境变量引用
    pub token: Option<String>,
    /// 最大尝试次数
    pub max_attempts: Option<u32>,
    /// 首次重试延迟（毫秒）
    pub retry_delay_ms: Option<u64>,
    /// 单次请求超时（秒）
    pub timeout_secs: Option<u64>,
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "ruprobe.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProbeConfig> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| RuprobeError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| RuprobeError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/ruprobe/
    pub fn find_and_load() -> Option<ProbeConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        if let Some(config) = Self::try_load_from_user_dir() {
            return Some(config);
        }

        None
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<ProbeConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<ProbeConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("ruprobe").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }
}

/// 解析并替换文本中的系统环境变量 ${VAR}
///
/// 未定义的变量保持原样，便于在报错信息里看出哪一项没展开
pub fn resolve_env_vars(text: &str) -> String {
    static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

    re.replace_all(text, |caps: &Captures| {
        let env_name = &caps[1];
        std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .to_string()
}
