//! # SEO 元数据审计
//!
//! 表格视图与结果卡片使用的长度检查：
//! - 标题：50-60 字符为 `Perfect`，否则 `Warning`
//! - Meta 描述：140-160 字符为 `Perfect`，否则 `Warning`
//! - Slug / H1 / 搜索意图：`Neutral`
//!
//! 字符数按 Unicode 标量计算（"ç" 计 1），与前端 `String.length` 对 BMP 字符的结果一致。

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::strategy::StrategyResult;

/// 标题理想长度区间
pub const TITLE_RANGE: (usize, usize) = (50, 60);

/// Meta 描述理想长度区间
pub const META_RANGE: (usize, usize) = (140, 160);

/// 友好 slug：小写字母数字单词，以单个短横线连接
static FRIENDLY_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// 表格行的审计状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditStatus {
    Perfect,
    Warning,
    Neutral,
}

/// 结果卡片的字数状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitStatus {
    TooShort,
    TooLong,
    Ok,
}

/// 被审计的元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditKind {
    Title,
    Meta,
    Slug,
    H1,
    Intent,
}

/// 审计表格的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRow {
    pub kind: AuditKind,
    /// 显示名称，如 "Título da Página"
    pub component: &'static str,
    /// 标签，如 "TITLE"
    pub tag: &'static str,
    /// 判定标准说明
    pub criteria: &'static str,
    pub content: String,
    /// 影响程度："Alto" / "Médio" / "Crítico"
    pub impact: &'static str,
    pub status: AuditStatus,
    pub char_count: usize,
    /// 进度条填充百分比（0-100），仅标题和 Meta 描述有值
    pub fill_percent: Option<u8>,
    /// slug 是否友好，仅 slug 行有值
    pub friendly: Option<bool>,
}

/// 字符数（Unicode 标量）
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// 按区间判定卡片字数状态
pub fn limit_status(count: usize, (min, max): (usize, usize)) -> LimitStatus {
    if count < min {
        LimitStatus::TooShort
    } else if count > max {
        LimitStatus::TooLong
    } else {
        LimitStatus::Ok
    }
}

/// 按元素类型判定表格审计状态
pub fn status_for(kind: AuditKind, content: &str) -> AuditStatus {
    let range = match kind {
        AuditKind::Title => TITLE_RANGE,
        AuditKind::Meta => META_RANGE,
        _ => return AuditStatus::Neutral,
    };
    match limit_status(char_count(content), range) {
        LimitStatus::Ok => AuditStatus::Perfect,
        _ => AuditStatus::Warning,
    }
}

/// slug 是否为友好格式
pub fn is_friendly_slug(slug: &str) -> bool {
    FRIENDLY_SLUG_RE.is_match(slug)
}

fn fill_percent(count: usize, max: usize) -> u8 {
    (count * 100 / max).min(100) as u8
}

/// 生成审计表格的全部行（顺序固定：标题、Meta、Slug、H1、意图）
pub fn audit_rows(result: &StrategyResult) -> Vec<AuditRow> {
    let row = |kind: AuditKind,
               component: &'static str,
               tag: &'static str,
               criteria: &'static str,
               content: &str,
               impact: &'static str| {
        let count = char_count(content);
        AuditRow {
            kind,
            component,
            tag,
            criteria,
            content: content.to_string(),
            impact,
            status: status_for(kind, content),
            char_count: count,
            fill_percent: match kind {
                AuditKind::Title => Some(fill_percent(count, TITLE_RANGE.1)),
                AuditKind::Meta => Some(fill_percent(count, META_RANGE.1)),
                _ => None,
            },
            friendly: (kind == AuditKind::Slug).then(|| is_friendly_slug(content)),
        }
    };

    vec![
        row(AuditKind::Title, "Título da Página", "TITLE", "50-60 chars", &result.title_tag, "Alto"),
        row(AuditKind::Meta, "Meta Descrição", "META", "140-160 chars", &result.meta_description, "Alto"),
        row(AuditKind::Slug, "Slug da URL", "URL", "Curto / Amigável", &result.slug, "Médio"),
        row(AuditKind::H1, "H1 Principal", "H1", "Foco Keyword", &result.h1, "Alto"),
        row(AuditKind::Intent, "Intenção de Busca", "INTENT", "Alinhamento Google", &result.search_intent, "Crítico"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_boundaries() {
        for (len, expected) in [
            (49, AuditStatus::Warning),
            (50, AuditStatus::Perfect),
            (60, AuditStatus::Perfect),
            (61, AuditStatus::Warning),
        ] {
            assert_eq!(status_for(AuditKind::Title, &"a".repeat(len)), expected, "len {len}");
        }
    }

    #[test]
    fn test_meta_boundaries() {
        for (len, expected) in [
            (139, AuditStatus::Warning),
            (140, AuditStatus::Perfect),
            (160, AuditStatus::Perfect),
            (161, AuditStatus::Warning),
        ] {
            assert_eq!(status_for(AuditKind::Meta, &"é".repeat(len)), expected, "len {len}");
        }
    }

    #[test]
    fn test_limit_status() {
        assert_eq!(limit_status(10, (50, 60)), LimitStatus::TooShort);
        assert_eq!(limit_status(55, (50, 60)), LimitStatus::Ok);
        assert_eq!(limit_status(70, (50, 60)), LimitStatus::TooLong);
    }

    #[test]
    fn test_friendly_slug() {
        assert!(is_friendly_slug("guia-definitivo-seo-2025"));
        assert!(!is_friendly_slug("Guia-SEO"));
        assert!(!is_friendly_slug("guia--seo"));
        assert!(!is_friendly_slug("-guia"));
        assert!(!is_friendly_slug("guia_seo"));
    }

    #[test]
    fn test_sample_rows() {
        let rows = audit_rows(&StrategyResult::sample());
        let tags: Vec<&str> = rows.iter().map(|r| r.tag).collect();
        assert_eq!(tags, ["TITLE", "META", "URL", "H1", "INTENT"]);

        assert_eq!(rows[0].status, AuditStatus::Perfect);
        assert_eq!(rows[2].friendly, Some(true));
        assert_eq!(rows[3].status, AuditStatus::Neutral);
        assert_eq!(rows[3].fill_percent, None);
        assert!(rows[1].fill_percent.unwrap() <= 100);
    }
}
