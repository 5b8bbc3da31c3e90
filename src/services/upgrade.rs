//! # 模拟升级流程
//!
//! 状态机：`Idle → Processing → Activated`。
//!
//! 进入 `Processing` 的触发方式：
//! - 支付页回跳的 URL 带有 `success=true` 或任意 `session_id` 查询参数
//! - 前端的手动触发（测试模式下的"模拟支付"按钮）
//!
//! 固定延时（`ACTIVATION_DELAY`）后进入 `Activated`：授予无限额度并产生一次性成功通知。
//!
//! ## 非权威性
//! 这里没有 webhook 校验、没有交易号对账、没有服务端往返。
//! 任何人只要在 URL 中带上对应参数就能触发激活，结果只是本地状态变更。
//! 如需真实收费，必须整体替换为服务端校验的 webhook 流程。

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::models::account::Entitlement;
use crate::services::entitlement::EntitlementStore;

/// 外部收银台链接
pub const PAYMENT_LINK: &str = "https://buy.stripe.com/test_aFadR9fPM0SQ8V4fIh87K00";

/// 合作伙伴（主机服务）推广链接
pub const AFFILIATE_LINK: &str = "https://www.hostinger.com.br/rankify";

/// 从进入 Processing 到激活的固定延时
pub const ACTIVATION_DELAY: Duration = Duration::from_millis(1500);

/// 升级流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeState {
    Idle,
    Processing,
    Activated,
}

/// 前端展示用的商业链接信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommerceLinks {
    pub payment_link: &'static str,
    /// 支付链接为测试链接（包含 `test_`）时前端展示"模拟支付"入口
    pub test_mode: bool,
    pub affiliate_link: &'static str,
}

impl CommerceLinks {
    pub fn current() -> Self {
        Self {
            payment_link: PAYMENT_LINK,
            test_mode: is_test_payment_link(PAYMENT_LINK),
            affiliate_link: AFFILIATE_LINK,
        }
    }
}

/// 支付链接是否为测试链接
pub fn is_test_payment_link(link: &str) -> bool {
    link.contains("test_")
}

/// 判断页面地址是否为支付回跳
///
/// 接受完整 URL（`https://app/?success=true`）或单独的查询串（`?session_id=cs_1`）。
/// `success` 必须恰好为 `true`；`session_id` 只要出现且非空即可。
pub fn is_payment_return(location: &str) -> bool {
    let location = location.trim();
    let query = match Url::parse(location) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => location
            .split_once('?')
            .map(|(_, q)| q)
            .unwrap_or(location)
            .to_string(),
    };

    url::form_urlencoded::parse(query.as_bytes()).any(|(key, value)| {
        (key == "success" && value == "true") || (key == "session_id" && !value.is_empty())
    })
}

/// 升级状态机
#[derive(Debug)]
pub struct UpgradeFlow {
    state: UpgradeState,
    notification_pending: bool,
}

impl Default for UpgradeFlow {
    fn default() -> Self {
        Self {
            state: UpgradeState::Idle,
            notification_pending: false,
        }
    }
}

impl UpgradeFlow {
    pub fn state(&self) -> UpgradeState {
        self.state
    }

    /// 进入 Processing
    ///
    /// # 返回值
    /// 已处于 Processing 时返回 `false`（重复触发被忽略），否则返回 `true`
    pub fn begin(&mut self) -> bool {
        if self.state == UpgradeState::Processing {
            return false;
        }
        self.state = UpgradeState::Processing;
        true
    }

    /// 完成激活：授予无限额度并挂起一次性通知
    ///
    /// # 错误
    /// 未处于 Processing，或额度写入失败（此时回到 Idle）
    pub fn complete(&mut self, credits: &mut EntitlementStore) -> Result<Entitlement, String> {
        if self.state != UpgradeState::Processing {
            return Err("Nenhuma ativação em andamento.".to_string());
        }

        match credits.grant_pro() {
            Ok(granted) => {
                self.state = UpgradeState::Activated;
                self.notification_pending = true;
                log::info!("Pro 已激活（本地模拟，未经服务端校验）");
                Ok(granted)
            }
            Err(e) => {
                self.state = UpgradeState::Idle;
                Err(e)
            }
        }
    }

    /// 取走成功通知；每次激活只返回一次 `true`
    pub fn take_notification(&mut self) -> bool {
        std::mem::take(&mut self.notification_pending)
    }
}
