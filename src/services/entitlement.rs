//! # 额度存储服务
//!
//! 跟踪"生成次数"这一稀缺资源以及 Pro / Agency 标志，并在每次变更后持久化。
//!
//! ## 生命周期
//! - 打开时读取持久化记录；不存在或损坏时使用默认免费额度 `{3, 3, false, false}`
//! - 每次成功的非 Pro 生成后 `consume()` 减一（下限 0）
//! - 升级或以 Pro 身份登录时 `grant_pro()` 整体替换为无限额度
//!
//! 存储键与前端历史版本保持一致：`rankify_credits`。

use std::sync::Arc;

use crate::models::account::Entitlement;
use crate::services::store::{self, RecordStore};

/// 额度记录的存储键
pub const CREDITS_KEY: &str = "rankify_credits";

/// 额度存储
///
/// 持有当前记录的内存副本，所有变更立即写回存储。
pub struct EntitlementStore {
    store: Arc<dyn RecordStore>,
    current: Entitlement,
}

impl EntitlementStore {
    /// 打开额度存储并加载当前记录
    pub fn open(store: Arc<dyn RecordStore>) -> Self {
        let current = store::load_record(store.as_ref(), CREDITS_KEY).unwrap_or_default();
        Self { store, current }
    }

    /// 当前记录
    pub fn current(&self) -> Entitlement {
        self.current
    }

    /// 重新从存储读取记录
    ///
    /// 记录不存在或损坏时返回默认免费额度（不写回）。
    pub fn load(&mut self) -> Entitlement {
        self.current = store::load_record(self.store.as_ref(), CREDITS_KEY).unwrap_or_default();
        self.current
    }

    /// 原样持久化给定记录
    ///
    /// # 错误
    /// 写入失败时返回错误，此时内存副本已更新
    pub fn save(&mut self, record: Entitlement) -> Result<(), String> {
        self.current = record;
        store::save_record(self.store.as_ref(), CREDITS_KEY, &record)
    }

    /// 消耗一次生成额度
    ///
    /// 仅在生成成功后调用。免费用户 `remaining` 减一（下限 0）；
    /// Pro 用户记录不变但仍会写回。
    pub fn consume(&mut self) -> Result<Entitlement, String> {
        let next = self.current.consumed();
        self.save(next)?;
        Ok(next)
    }

    /// 授予 Pro / Agency 无限额度
    ///
    /// 幂等：重复调用得到相同记录。
    pub fn grant_pro(&mut self) -> Result<Entitlement, String> {
        let granted = Entitlement::unlimited();
        self.save(granted)?;
        Ok(granted)
    }

    /// 是否允许发起新的生成
    pub fn can_generate(&self) -> bool {
        self.current.can_generate()
    }
}
