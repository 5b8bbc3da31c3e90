//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `strategy` - 策略生成、示例加载、审计表格
//! - `account` - 额度、登录登出、升级与外部链接
//! - `branding` - 白标配置读写
//! - `export` - 导出剪贴板文本、CSV、Markdown 报告

use serde::Serialize;

use crate::services::state::AppError;

pub mod account;
pub mod branding;
pub mod export;
pub mod strategy;

/// 返回给前端的结构化错误
///
/// `kind` 供前端分支判断（如 `creditsExhausted` 时弹出升级窗口），
/// `message` 为可直接展示的葡萄牙语提示。
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub kind: &'static str,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
