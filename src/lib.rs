//! # Rankify - Tauri 应用核心初始化模块
//!
//! 本模块负责 Tauri 应用的完整初始化流程，包括：
//! - 注册 Tauri 官方插件（Opener、调试模式下的日志）
//! - 读取运行配置并初始化应用全局状态（额度、会话、策略客户端）
//! - 注册自定义 Tauri commands（策略生成、账户、白标、导出）
//! - 生成应用上下文并启动事件循环
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（额度、会话、生成、审计、导出）
//! - `utils/` - 通用工具函数

mod commands;
mod models;
mod services;
mod utils;

use tauri::Manager;

use models::settings::AppSettings;
use services::state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册 Opener 插件（付款页和合作伙伴链接在系统浏览器中打开）
/// 2. 注册所有自定义 Tauri commands
/// 3. 在 `setup` 钩子中注册调试日志插件，读取环境配置并注册 `AppState`
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// Tauri 应用启动失败（配置缺失、窗口创建失败）时 panic
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            // 策略生成
            commands::strategy::generate_strategy,
            commands::strategy::load_sample_strategy,
            commands::strategy::current_strategy,
            commands::strategy::audit_strategy,
            // 账户与升级
            commands::account::get_account,
            commands::account::login,
            commands::account::logout,
            commands::account::activate_pro,
            commands::account::check_payment_return,
            commands::account::take_upgrade_notification,
            commands::account::get_commerce_links,
            commands::account::open_checkout,
            commands::account::open_partner_offer,
            // 白标
            commands::branding::get_branding,
            commands::branding::update_branding,
            commands::branding::reset_branding,
            commands::branding::get_color_presets,
            // 导出
            commands::export::export_clipboard_text,
            commands::export::export_csv,
            commands::export::export_report,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            let settings = AppSettings::from_env()?;
            log::info!(
                "Rankify 启动: 模型 {}，数据目录 {}",
                settings.model,
                settings.data_dir.display()
            );
            app.manage(AppState::from_settings(&settings)?);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
