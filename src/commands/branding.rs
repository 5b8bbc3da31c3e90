//! # 白标配置 Tauri Commands

use tauri::State;

use crate::models::branding::BrandingConfig;
use crate::services::branding::COLOR_PRESETS;
use crate::services::state::AppState;

/// 读取当前白标配置
///
/// 配置只保存在内存中，应用重启后回到默认值。
///
/// # 返回值
/// 当前白标配置（是否生效另由 Pro 状态决定，见 `branding::effective`）
#[tauri::command]
pub async fn get_branding(state: State<'_, AppState>) -> Result<BrandingConfig, String> {
    Ok(state.branding().await)
}

/// 保存白标配置
///
/// # 参数
/// - `config` - 前端表单提交的完整配置
///
/// # 返回值
/// 校验后实际保存的配置（主色统一为小写）
///
/// # 错误
/// 非 Pro 用户启用白标，或主色不是 `#rrggbb`
#[tauri::command]
pub async fn update_branding(
    config: BrandingConfig,
    state: State<'_, AppState>,
) -> Result<BrandingConfig, String> {
    state.update_branding(config).await
}

/// 恢复默认白标配置
///
/// 同时关闭白标，报告回到 Rankify 署名。
///
/// # 返回值
/// 恢复后的默认配置
#[tauri::command]
pub async fn reset_branding(state: State<'_, AppState>) -> Result<BrandingConfig, String> {
    Ok(state.reset_branding().await)
}

/// 配色预设（名称, 颜色）
#[tauri::command]
pub async fn get_color_presets() -> Result<Vec<(String, String)>, String> {
    Ok(COLOR_PRESETS
        .iter()
        .map(|(name, color)| (name.to_string(), color.to_string()))
        .collect())
}
