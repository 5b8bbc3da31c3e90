//! # 白标品牌服务
//!
//! 白标配置的校验与生效规则：
//! - 只有 Pro 额度才能启用白标（`enabled = true`）
//! - 主色必须为 `#rrggbb` 格式
//! - 生效条件：`enabled && is_pro`，否则报告和界面使用产品自身品牌

use crate::models::account::Entitlement;
use crate::models::branding::BrandingConfig;

/// 预设配色（名称, 颜色）
pub const COLOR_PRESETS: [(&str, &str); 6] = [
    ("Rankify", "#4f46e5"),
    ("Midnight", "#0f172a"),
    ("Emerald", "#059669"),
    ("Rose", "#e11d48"),
    ("Ocean", "#0369a1"),
    ("Amber", "#d97706"),
];

/// 是否为 `#rrggbb` 颜色
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// 校验新的白标配置
///
/// 主色统一转为小写后返回。
///
/// # 错误
/// - 非 Pro 用户尝试启用白标
/// - 主色格式不正确
pub fn validate(mut config: BrandingConfig, entitlement: &Entitlement) -> Result<BrandingConfig, String> {
    if config.enabled && !entitlement.is_pro {
        return Err("A marca própria (White Label) está disponível apenas no plano Pro.".to_string());
    }
    if !is_hex_color(&config.primary_color) {
        return Err(format!("Cor inválida: {}. Use o formato #rrggbb.", config.primary_color));
    }
    config.primary_color = config.primary_color.to_ascii_lowercase();
    Ok(config)
}

/// 当前生效的白标配置；未生效时返回 `None`
pub fn effective<'a>(config: &'a BrandingConfig, entitlement: &Entitlement) -> Option<&'a BrandingConfig> {
    (config.enabled && entitlement.is_pro).then_some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#4F46e5"));
        assert!(!is_hex_color("4f46e5"));
        assert!(!is_hex_color("#4f46e"));
        assert!(!is_hex_color("#4f46eg"));
        assert!(COLOR_PRESETS.iter().all(|(_, c)| is_hex_color(c)));
    }

    #[test]
    fn test_free_user_cannot_enable() {
        let config = BrandingConfig {
            enabled: true,
            ..BrandingConfig::default()
        };
        assert!(validate(config.clone(), &Entitlement::default()).is_err());
        assert!(validate(config, &Entitlement::unlimited()).is_ok());
    }

    #[test]
    fn test_free_user_can_edit_disabled_config() {
        let config = BrandingConfig {
            name: "Agência X".into(),
            primary_color: "#E11D48".into(),
            ..BrandingConfig::default()
        };
        let saved = validate(config, &Entitlement::default()).unwrap();
        assert_eq!(saved.primary_color, "#e11d48");
    }

    #[test]
    fn test_effective_requires_pro_and_enabled() {
        let enabled = BrandingConfig {
            enabled: true,
            ..BrandingConfig::default()
        };
        assert!(effective(&enabled, &Entitlement::unlimited()).is_some());
        assert!(effective(&enabled, &Entitlement::default()).is_none());
        assert!(effective(&BrandingConfig::default(), &Entitlement::unlimited()).is_none());
    }
}
