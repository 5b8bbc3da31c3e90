//! # 账户与升级 Tauri Commands
//!
//! - 额度与登录身份：`get_account`、`login`、`logout`
//! - 模拟升级：`activate_pro`、`check_payment_return`、`take_upgrade_notification`
//! - 外部链接：`get_commerce_links`、`open_checkout`、`open_partner_offer`
//!
//! 激活成功后向前端广播 `pro-activated` 事件，负载为新的额度记录。

use tauri::{AppHandle, Emitter, State};
use tauri_plugin_opener::OpenerExt;

use crate::models::account::Entitlement;
use crate::services::state::{AccountSnapshot, AppState};
use crate::services::upgrade::{ACTIVATION_DELAY, CommerceLinks};

/// 升级激活事件名
const PRO_ACTIVATED_EVENT: &str = "pro-activated";

/// 广播激活事件；发送失败只记录日志
fn notify_activated(app: &AppHandle, granted: Option<Entitlement>) -> Option<Entitlement> {
    if let Some(entitlement) = granted {
        if let Err(e) = app.emit(PRO_ACTIVATED_EVENT, entitlement) {
            log::warn!("发送 {} 事件失败: {}", PRO_ACTIVATED_EVENT, e);
        }
    }
    granted
}

/// 当前额度、登录身份和升级状态
///
/// # 返回值
/// 账户快照；`session` 为 `None` 表示访客模式
#[tauri::command]
pub async fn get_account(state: State<'_, AppState>) -> Result<AccountSnapshot, String> {
    Ok(state.snapshot().await)
}

/// 以邮箱登录
///
/// 邮箱包含 "pro"、"admin" 或 "agencia" 时以 Pro 身份登录并获得无限额度。
///
/// # 错误
/// 邮箱格式不正确或记录写入失败
#[tauri::command]
pub async fn login(email: String, state: State<'_, AppState>) -> Result<AccountSnapshot, String> {
    state.login(&email).await
}

/// 登出并恢复登录前的访客额度
///
/// # 返回值
/// 登出后的账户快照
///
/// # 错误
/// 记录写入或删除失败
#[tauri::command]
pub async fn logout(state: State<'_, AppState>) -> Result<AccountSnapshot, String> {
    state.logout().await
}

/// 模拟付款确认并激活 Pro
///
/// # 返回值
/// - `Some(entitlement)` - 激活完成
/// - `None` - 已有激活在进行，本次点击被忽略
#[tauri::command]
pub async fn activate_pro(app: AppHandle, state: State<'_, AppState>) -> Result<Option<Entitlement>, String> {
    let granted = state.activate_pro(ACTIVATION_DELAY).await?;
    Ok(notify_activated(&app, granted))
}

/// 检查启动地址是否为支付回跳（`success=true` 或带 `session_id`），是则激活 Pro
///
/// # 参数
/// - `location` - 前端的 `window.location.href`
#[tauri::command]
pub async fn check_payment_return(
    location: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Option<Entitlement>, String> {
    let granted = state.handle_payment_return(&location, ACTIVATION_DELAY).await?;
    Ok(notify_activated(&app, granted))
}

/// 取走一次性的"Pro 已激活"通知
///
/// # 返回值
/// 每次激活只有第一次调用返回 `true`
#[tauri::command]
pub async fn take_upgrade_notification(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.take_upgrade_notification().await)
}

/// 获取付款链接、测试模式标志和合作伙伴链接
///
/// 前端据此决定是否展示"模拟支付"入口（测试链接时）以及合作伙伴优惠卡片。
///
/// # 返回值
/// 当前构建内置的商业链接信息
#[tauri::command]
pub async fn get_commerce_links() -> Result<CommerceLinks, String> {
    Ok(CommerceLinks::current())
}

/// 在系统浏览器中打开付款页面
///
/// # 错误
/// 系统浏览器无法打开时返回错误
#[tauri::command]
pub async fn open_checkout(app: AppHandle) -> Result<(), String> {
    let links = CommerceLinks::current();
    if links.test_mode {
        log::info!("打开测试模式付款链接");
    }
    app.opener()
        .open_url(links.payment_link, None::<&str>)
        .map_err(|e| format!("Não foi possível abrir o checkout: {}", e))
}

/// 在系统浏览器中打开合作伙伴优惠页面
///
/// # 错误
/// 系统浏览器无法打开时返回错误
#[tauri::command]
pub async fn open_partner_offer(app: AppHandle) -> Result<(), String> {
    app.opener()
        .open_url(CommerceLinks::current().affiliate_link, None::<&str>)
        .map_err(|e| format!("Não foi possível abrir o link: {}", e))
}
