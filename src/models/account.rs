//! # 账户数据模型
//!
//! 定义额度记录（`Entitlement`）与登录会话（`Session`）。
//! 两者均以 JSON 形式持久化到本地数据目录，对应前端 TypeScript 中的
//! `UserCredits` 与 `User` 接口。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// 免费用户的默认生成次数
pub const FREE_ALLOTMENT: u32 = 3;

/// "无限"额度的哨兵值：升级 Pro 或以 Pro 身份登录后写入
pub const UNLIMITED_CREDITS: u32 = 9999;

/// 额度记录
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface UserCredits {
///   remaining: number;
///   total: number;
///   isPro: boolean;
///   isAgency?: boolean;
/// }
/// ```
///
/// 不变量：`remaining` 永不为负（由 `u32` 与饱和减法保证），
/// 除无限哨兵外 `remaining <= total`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// 剩余可用生成次数
    pub remaining: u32,
    /// 额度总量
    pub total: u32,
    /// 是否为 Pro 用户（无限生成、无广告、PDF 导出）
    pub is_pro: bool,
    /// 是否解锁白标品牌（旧记录可能缺失此字段）
    #[serde(default)]
    pub is_agency: bool,
}

impl Default for Entitlement {
    /// 首次使用时的免费额度：`{3, 3, false, false}`
    fn default() -> Self {
        Self {
            remaining: FREE_ALLOTMENT,
            total: FREE_ALLOTMENT,
            is_pro: false,
            is_agency: false,
        }
    }
}

impl Entitlement {
    /// Pro / Agency 无限额度记录
    pub fn unlimited() -> Self {
        Self {
            remaining: UNLIMITED_CREDITS,
            total: UNLIMITED_CREDITS,
            is_pro: true,
            is_agency: true,
        }
    }

    /// 是否允许发起新的生成
    pub fn can_generate(&self) -> bool {
        self.is_pro || self.remaining > 0
    }

    /// 消耗一次额度后的记录（Pro 不变，免费用户下限为 0）
    pub fn consumed(self) -> Self {
        if self.is_pro {
            return self;
        }
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }
}

/// 登录会话
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface User {
///   email: string;
///   isPro: boolean;
///   token?: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub is_pro: bool,
    /// 由邮箱派生的不透明 token，不具备任何安全含义
    #[serde(default)]
    pub token: String,
}

impl Session {
    /// 构造会话并派生 token
    pub fn new(email: impl Into<String>, is_pro: bool) -> Self {
        let email = email.into();
        let token = STANDARD.encode(email.as_bytes());
        Self {
            email,
            is_pro,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumed_floors_at_zero() {
        let empty = Entitlement {
            remaining: 0,
            ..Entitlement::default()
        };
        assert_eq!(empty.consumed().remaining, 0);
        assert_eq!(Entitlement::default().consumed().remaining, 2);
    }

    #[test]
    fn test_consumed_keeps_pro_unchanged() {
        assert_eq!(Entitlement::unlimited().consumed(), Entitlement::unlimited());
    }

    #[test]
    fn test_legacy_record_without_agency_flag() {
        let parsed: Entitlement =
            serde_json::from_str(r#"{"remaining":1,"total":3,"isPro":false}"#).unwrap();
        assert_eq!(parsed.remaining, 1);
        assert!(!parsed.is_agency);
    }

    #[test]
    fn test_session_token_is_base64_of_email() {
        let session = Session::new("user@x.com", false);
        assert_eq!(session.token, "dXNlckB4LmNvbQ==");
    }
}
