//! # 登录会话服务
//!
//! 模拟登录：跨重启保存登录身份，并根据身份调整额度记录。
//!
//! ## 身份分级
//! 分级逻辑通过 `IdentityClassifier` 注入。默认的 `SubstringClassifier`
//! 在邮箱包含 `pro`、`admin` 或 `agencia`（区分大小写）时判定为 Pro。
//! 这只是演示用的启发式规则，不构成任何安全边界；接入真实鉴权时
//! 替换分级器即可。
//!
//! ## 额度联动
//! - Pro 登录：先将登录前的额度记录暂存到 `rankify_credits_before_pro`，再授予无限额度
//! - 免费登录：保留已持久化的额度记录（登录不会重置剩余次数）
//! - 登出：恢复暂存记录；没有暂存时重新读取持久化记录（或默认值）
//!
//! 重启时 `restore()` 以存储的身份重放登录，暂存记录只在首次 Pro 登录时写入，
//! 因此重放是幂等的。

use std::sync::Arc;

use crate::models::account::{Entitlement, Session};
use crate::services::entitlement::EntitlementStore;
use crate::services::store::{self, RecordStore};

/// 会话记录的存储键
pub const SESSION_KEY: &str = "rankify_session";

/// Pro 登录前额度记录的暂存键
pub const STASHED_CREDITS_KEY: &str = "rankify_credits_before_pro";

/// 身份等级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Pro,
    Free,
}

/// 身份分级器：邮箱 → 等级
pub trait IdentityClassifier: Send + Sync {
    fn classify(&self, email: &str) -> Tier;
}

/// 基于子串匹配的演示分级器
pub struct SubstringClassifier {
    markers: Vec<String>,
}

impl SubstringClassifier {
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SubstringClassifier {
    fn default() -> Self {
        Self::new(["pro", "admin", "agencia"])
    }
}

impl IdentityClassifier for SubstringClassifier {
    fn classify(&self, email: &str) -> Tier {
        if self.markers.iter().any(|m| email.contains(m.as_str())) {
            Tier::Pro
        } else {
            Tier::Free
        }
    }
}

/// 根据登录表单输入的邮箱构造会话
///
/// 与登录表单一致，唯一的格式检查是包含 `@`。
///
/// # 错误
/// 邮箱不含 `@` 时返回错误
pub fn identify(email: &str, classifier: &dyn IdentityClassifier) -> Result<Session, String> {
    let email = email.trim();
    if !email.contains('@') {
        return Err("Informe um e-mail válido.".to_string());
    }
    let is_pro = classifier.classify(email) == Tier::Pro;
    Ok(Session::new(email, is_pro))
}

/// 会话存储
pub struct SessionStore {
    store: Arc<dyn RecordStore>,
    current: Option<Session>,
}

impl SessionStore {
    /// 打开会话存储（不自动恢复，见 `restore`）
    pub fn open(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// 当前登录身份；`None` 表示访客模式
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// 登录
    ///
    /// # 参数
    /// - `session` - 登录身份
    /// - `credits` - 额度存储，根据身份等级联动更新
    ///
    /// # 返回值
    /// 登录后生效的额度记录
    ///
    /// # 错误
    /// 任一记录写入失败时返回错误
    pub fn login(&mut self, session: Session, credits: &mut EntitlementStore) -> Result<Entitlement, String> {
        store::save_record(self.store.as_ref(), SESSION_KEY, &session)?;
        let is_pro = session.is_pro;
        self.current = Some(session);

        if is_pro {
            if self.stashed()?.is_none() {
                store::save_record(self.store.as_ref(), STASHED_CREDITS_KEY, &credits.current())?;
            }
            return credits.grant_pro();
        }

        // 从 Pro 身份直接切换到免费身份时，先归还 Pro 登录前的额度
        if let Some(previous) = self.take_stash()? {
            credits.save(previous)?;
            return Ok(previous);
        }
        Ok(credits.load())
    }

    /// 登出
    ///
    /// # 返回值
    /// 登出后生效的额度记录
    pub fn logout(&mut self, credits: &mut EntitlementStore) -> Result<Entitlement, String> {
        self.current = None;
        self.store.remove(SESSION_KEY)?;

        match self.take_stash()? {
            Some(previous) => {
                credits.save(previous)?;
                Ok(previous)
            }
            None => Ok(credits.load()),
        }
    }

    /// 启动时恢复持久化的登录身份
    ///
    /// # 返回值
    /// 恢复出的会话；没有持久化身份时返回 `None`
    pub fn restore(&mut self, credits: &mut EntitlementStore) -> Result<Option<Session>, String> {
        let Some(saved) = store::load_record::<Session>(self.store.as_ref(), SESSION_KEY) else {
            return Ok(None);
        };
        self.login(saved.clone(), credits)?;
        Ok(Some(saved))
    }

    /// 丢弃 Pro 登录前暂存的额度
    ///
    /// 付费升级完成后调用：登出时保留已购买的无限额度，而不是回到暂存的免费记录。
    pub fn discard_stash(&self) -> Result<(), String> {
        self.store.remove(STASHED_CREDITS_KEY)
    }

    fn stashed(&self) -> Result<Option<Entitlement>, String> {
        if self.store.read(STASHED_CREDITS_KEY)?.is_none() {
            return Ok(None);
        }
        Ok(store::load_record(self.store.as_ref(), STASHED_CREDITS_KEY))
    }

    fn take_stash(&self) -> Result<Option<Entitlement>, String> {
        let stashed = self.stashed()?;
        self.store.remove(STASHED_CREDITS_KEY)?;
        Ok(stashed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::entitlement::CREDITS_KEY;
    use crate::services::store::MemoryStore;

    struct Fixture {
        backing: Arc<MemoryStore>,
        credits: EntitlementStore,
        sessions: SessionStore,
    }

    fn fixture() -> Fixture {
        let backing = Arc::new(MemoryStore::new());
        Fixture {
            credits: EntitlementStore::open(backing.clone()),
            sessions: SessionStore::open(backing.clone()),
            backing,
        }
    }

    fn login(fx: &mut Fixture, email: &str) -> Entitlement {
        let session = identify(email, &SubstringClassifier::default()).unwrap();
        fx.sessions.login(session, &mut fx.credits).unwrap()
    }

    #[test]
    fn test_classifier_markers_are_case_sensitive() {
        let classifier = SubstringClassifier::default();
        assert_eq!(classifier.classify("agencia@x.com"), Tier::Pro);
        assert_eq!(classifier.classify("ceo@produto.com"), Tier::Pro);
        assert_eq!(classifier.classify("root@admin.io"), Tier::Pro);
        assert_eq!(classifier.classify("PRO@x.com"), Tier::Free);
        assert_eq!(classifier.classify("user@x.com"), Tier::Free);
    }

    #[test]
    fn test_identify_requires_at_sign() {
        assert!(identify("user.x.com", &SubstringClassifier::default()).is_err());
        let session = identify("  user@x.com ", &SubstringClassifier::default()).unwrap();
        assert_eq!(session.email, "user@x.com");
        assert!(!session.is_pro);
    }

    #[test]
    fn test_pro_login_grants_unlimited() {
        let mut fx = fixture();
        let granted = login(&mut fx, "agencia@x.com");
        assert_eq!(granted.remaining, 9999);
        assert!(granted.is_pro);
        assert_eq!(fx.sessions.current().map(|s| s.email.as_str()), Some("agencia@x.com"));
    }

    #[test]
    fn test_free_login_preserves_persisted_credits() {
        let mut fx = fixture();
        fx.credits.consume().unwrap();
        let before = fx.credits.current();

        let after = login(&mut fx, "user@x.com");
        assert_eq!(after, before);
        assert_eq!(after.remaining, 2);
    }

    #[test]
    fn test_logout_after_pro_login_restores_previous_record() {
        let mut fx = fixture();
        fx.credits.consume().unwrap();
        let before = fx.credits.current();

        login(&mut fx, "admin@x.com");
        let restored = fx.sessions.logout(&mut fx.credits).unwrap();

        assert_eq!(restored, before);
        assert_eq!(fx.credits.load(), before);
        assert!(fx.sessions.current().is_none());
        assert_eq!(fx.backing.read(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_without_prior_record_restores_default() {
        let mut fx = fixture();
        login(&mut fx, "pro@x.com");
        assert_eq!(fx.sessions.logout(&mut fx.credits).unwrap(), Entitlement::default());
    }

    #[test]
    fn test_restore_replays_pro_login_idempotently() {
        let mut fx = fixture();
        fx.credits.consume().unwrap();
        let before = fx.credits.current();
        login(&mut fx, "pro@x.com");

        // 模拟两次重启
        for _ in 0..2 {
            let mut credits = EntitlementStore::open(fx.backing.clone());
            let mut sessions = SessionStore::open(fx.backing.clone());
            let restored = sessions.restore(&mut credits).unwrap();
            assert_eq!(restored.map(|s| s.email), Some("pro@x.com".to_string()));
            assert_eq!(credits.current(), Entitlement::unlimited());
        }

        let mut credits = EntitlementStore::open(fx.backing.clone());
        let mut sessions = SessionStore::open(fx.backing.clone());
        sessions.restore(&mut credits).unwrap();
        assert_eq!(sessions.logout(&mut credits).unwrap(), before);
    }

    #[test]
    fn test_restore_without_session_is_guest() {
        let mut fx = fixture();
        assert_eq!(fx.sessions.restore(&mut fx.credits).unwrap(), None);
        assert_eq!(fx.credits.current(), Entitlement::default());
    }

    #[test]
    fn test_switching_from_pro_to_free_identity_returns_stash() {
        let mut fx = fixture();
        login(&mut fx, "pro@x.com");
        let after = login(&mut fx, "user@x.com");
        assert_eq!(after, Entitlement::default());
        assert!(fx.backing.read(CREDITS_KEY).unwrap().is_some());
        assert_eq!(fx.backing.read(STASHED_CREDITS_KEY).unwrap(), None);
    }

    #[test]
    fn test_discarded_stash_keeps_granted_credits_after_logout() {
        let mut fx = fixture();
        login(&mut fx, "pro@x.com");
        fx.credits.grant_pro().unwrap();
        fx.sessions.discard_stash().unwrap();

        let after = fx.sessions.logout(&mut fx.credits).unwrap();
        assert_eq!(after, Entitlement::unlimited());
        assert!(fx.sessions.current().is_none());
        assert_eq!(fx.backing.read(STASHED_CREDITS_KEY).unwrap(), None);
    }
}
