//! # 白标品牌配置数据模型
//!
//! 对应前端 TypeScript 接口 `AgencyConfig`。
//! 仅保存在进程内存中，不写入本地数据目录，重启后恢复默认值。

use serde::{Deserialize, Serialize};

/// 产品自身的主色
pub const DEFAULT_PRIMARY_COLOR: &str = "#4f46e5";

/// 白标品牌配置
///
/// `enabled` 只有在 Pro 额度下才会生效，见 `services::branding::effective`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
    /// 代理机构名称，显示在报告封面和页脚
    pub name: String,
    /// Logo 地址（URL 或 data URI），为空时使用产品 Logo
    pub logo_url: String,
    /// 主色，格式 `#rrggbb`
    pub primary_color: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub footer_text: String,
    pub enabled: bool,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            name: "Minha Agência Digital".into(),
            logo_url: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.into(),
            contact_email: "contato@agencia.com".into(),
            website_url: "www.agencia.com".into(),
            footer_text: "Estratégia SEO Profissional".into(),
            enabled: false,
        }
    }
}
