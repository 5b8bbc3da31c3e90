//! # 策略生成 Tauri Commands
//!
//! - `generate_strategy` - 为关键词生成 SEO 策略并扣减额度
//! - `load_sample_strategy` - 加载内置示例结果
//! - `current_strategy` - 读取当前展示的策略
//! - `audit_strategy` - 当前策略的审计表格

use tauri::State;

use crate::commands::CommandError;
use crate::models::strategy::StrategyResult;
use crate::services::audit::AuditRow;
use crate::services::state::{AppState, GenerationOutcome};

/// 为关键词生成 SEO 策略
///
/// # 参数
/// - `keyword` - 用户输入的关键词（首尾空白会被去除）
///
/// # 返回值
/// 策略结果及扣减后的额度
///
/// # 错误
/// 返回 `CommandError`，`kind` 取值见 `AppError::kind`
#[tauri::command]
pub async fn generate_strategy(
    keyword: String,
    state: State<'_, AppState>,
) -> Result<GenerationOutcome, CommandError> {
    state.generate(&keyword).await.map_err(|e| {
        log::warn!("策略生成失败 [{}]: {}", e.kind(), e);
        CommandError::from(e)
    })
}

/// 加载内置示例结果，不消耗额度
///
/// # 返回值
/// 内置示例策略，同时设为当前策略
#[tauri::command]
pub async fn load_sample_strategy(state: State<'_, AppState>) -> Result<StrategyResult, String> {
    Ok(state.load_sample().await)
}

/// 读取当前展示的策略
///
/// 前端重新挂载结果视图时调用，避免重复生成消耗额度。
///
/// # 返回值
/// 最近一次生成或加载的示例结果；尚未生成时返回 `None`
#[tauri::command]
pub async fn current_strategy(state: State<'_, AppState>) -> Result<Option<StrategyResult>, String> {
    Ok(state.current_strategy().await)
}

/// 当前策略的审计表格（标题、Meta、URL、H1、意图）
///
/// # 返回值
/// 固定顺序的五行审计结果，含字数和进度条百分比
///
/// # 错误
/// 尚无当前策略时返回 `noStrategy`
#[tauri::command]
pub async fn audit_strategy(state: State<'_, AppState>) -> Result<Vec<AuditRow>, CommandError> {
    state.audit().await.map_err(CommandError::from)
}
