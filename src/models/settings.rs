//! # 应用运行配置
//!
//! 启动时从环境变量解析的配置项：
//! - `API_KEY` / `GEMINI_API_KEY` - Gemini API 凭据
//! - `RANKIFY_MODEL` - 模型名称
//! - `RANKIFY_API_BASE` - API 根地址（便于代理或本地替身）
//! - `RANKIFY_TIMEOUT_SECS` - HTTP 请求超时
//! - `RANKIFY_DATA_DIR` - 本地数据目录，默认 `~/.rankify/`

use std::path::PathBuf;

use crate::utils::path;

/// 默认模型
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// 默认 API 根地址
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// 应用运行配置
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// 原始凭据值，是否可用由 `strategy_client::usable_credential` 判定
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    /// 额度与会话记录的存放目录
    pub data_dir: PathBuf,
}

impl AppSettings {
    /// 从进程环境变量读取配置
    ///
    /// # 错误
    /// 未设置 `RANKIFY_DATA_DIR` 且无法确定用户主目录时返回错误
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过任意查找函数解析配置
    ///
    /// 空字符串视为未设置；无法解析的超时值回退为默认值。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_dir = match get("RANKIFY_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => path::get_data_dir()?,
        };

        let timeout_secs = get("RANKIFY_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key: get("API_KEY").or_else(|| get("GEMINI_API_KEY")),
            model: get("RANKIFY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get("RANKIFY_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timeout_secs,
            data_dir,
        })
    }
}
