//! # 导出 Tauri Commands
//!
//! 导出内容以字符串返回，由前端写入剪贴板或触发下载。
//! CSV 与 Markdown 报告为 Pro 功能。

use tauri::State;

use crate::commands::CommandError;
use crate::services::state::AppState;

/// 审计表格的"全部复制"文本
///
/// # 返回值
/// 每行 `组件 [标签]:` 加内容，行间空一行
///
/// # 错误
/// 尚无当前策略时返回 `noStrategy`
#[tauri::command]
pub async fn export_clipboard_text(state: State<'_, AppState>) -> Result<String, CommandError> {
    state.export_clipboard_text().await.map_err(CommandError::from)
}

/// 审计表格 CSV
///
/// # 错误
/// 无当前策略（`noStrategy`）或非 Pro（`proRequired`）
#[tauri::command]
pub async fn export_csv(state: State<'_, AppState>) -> Result<String, CommandError> {
    state.export_csv().await.map_err(CommandError::from)
}

/// Markdown 策略报告
///
/// # 参数
/// - `issued_on` - 签发日期，由前端按 pt-BR 本地格式生成
#[tauri::command]
pub async fn export_report(issued_on: String, state: State<'_, AppState>) -> Result<String, CommandError> {
    state.export_report(&issued_on).await.map_err(CommandError::from)
}
