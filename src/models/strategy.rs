//! # SEO 策略结果数据模型
//!
//! 定义 AI 生成调用返回的结构化结果 `StrategyResult` 及其子结构。
//! 字段名与 Gemini 响应 schema、前端 TypeScript 类型保持一致（camelCase）。
//!
//! ## 契约
//! 所有字段均为必填，所有列表字段至少包含一个元素。
//! 反序列化不提供任何默认值：缺字段即视为响应格式错误，
//! 由 `validate()` 进一步拒绝空列表。

use serde::{Deserialize, Serialize};

/// FAQ 条目：一问一答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// 策略任务优先级
///
/// 线上格式使用葡语字面量（`"Crítica"` / `"Alta"` / `"Média"`），
/// 与 schema 中的枚举一致；输入时同时接受英文写法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Crítica", alias = "Critical")]
    Critical,
    #[serde(rename = "Alta", alias = "High")]
    High,
    #[serde(rename = "Média", alias = "Medium")]
    Medium,
}

impl Priority {
    /// schema 中允许的全部字面量，顺序即优先级从高到低
    pub const WIRE_VALUES: [&'static str; 3] = ["Crítica", "Alta", "Média"];

    /// 返回线上字面量
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Crítica",
            Priority::High => "Alta",
            Priority::Medium => "Média",
        }
    }
}

/// 三阶段战略计划中的单个任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicTask {
    /// 阶段名称，如 "Fase 1: Fundação"
    pub phase: String,
    /// 具体执行动作
    pub task: String,
    pub priority: Priority,
}

/// 一次 AI 生成调用的完整结构化输出
///
/// 对应前端 TypeScript 接口 `SEOData`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResult {
    /// 页面标题（Title Tag），理想长度 50-60 字符
    pub title_tag: String,
    /// Meta 描述，理想长度 140-160 字符
    pub meta_description: String,
    pub slug: String,
    pub h1: String,
    /// 内容大纲建议
    pub content_topic_suggestions: Vec<String>,
    /// 次要关键词（LSI）
    pub secondary_keywords: Vec<String>,
    pub image_alt_suggestions: Vec<String>,
    pub internal_link_ideas: Vec<String>,
    pub external_link_ideas: Vec<String>,
    pub faq: Vec<FaqItem>,
    pub search_intent: String,
    pub target_audience: String,
    pub strategic_plan: Vec<StrategicTask>,
}

impl StrategyResult {
    /// 校验列表字段非空
    ///
    /// # 返回值
    /// - `Ok(())` - 全部列表字段至少有一个元素
    /// - `Err(field)` - 第一个为空的字段名（camelCase，与 schema 一致）
    pub fn validate(&self) -> Result<(), &'static str> {
        let lists: [(&'static str, bool); 7] = [
            ("contentTopicSuggestions", self.content_topic_suggestions.is_empty()),
            ("secondaryKeywords", self.secondary_keywords.is_empty()),
            ("imageAltSuggestions", self.image_alt_suggestions.is_empty()),
            ("internalLinkIdeas", self.internal_link_ideas.is_empty()),
            ("externalLinkIdeas", self.external_link_ideas.is_empty()),
            ("faq", self.faq.is_empty()),
            ("strategicPlan", self.strategic_plan.is_empty()),
        ];

        match lists.iter().find(|(_, empty)| *empty) {
            Some((field, _)) => Err(*field),
            None => Ok(()),
        }
    }

    /// 内置演示数据
    ///
    /// 前端"查看示例"按钮使用，不消耗额度、不调用网络。
    pub fn sample() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            title_tag: "SEO Master: O Guia Definitivo para Rankear em 2025".into(),
            meta_description: "Descubra as estratégias secretas que as agências usam para dominar a primeira página do Google. Conteúdo atualizado com foco em IA e Core Web Vitals.".into(),
            slug: "guia-definitivo-seo-2025".into(),
            h1: "Como Dominar o Google em 2025 com Inteligência Artificial".into(),
            content_topic_suggestions: strings(&[
                "O que mudou no SEO com a Inteligência Artificial",
                "Fatores de Rankeamento Críticos (Core Web Vitals)",
                "Otimização de Conteúdo para Intenção de Busca",
                "Estratégias de Link Building de Alta Autoridade",
                "FAQ: Principais dúvidas sobre o futuro do SEO",
            ]),
            secondary_keywords: strings(&[
                "seo para ia",
                "otimização de buscas",
                "ctr engine",
                "vitals google",
                "estratégia de conteúdo",
            ]),
            image_alt_suggestions: strings(&[
                "Gráfico mostrando aumento de tráfego orgânico com Rankify AI",
                "Interface do dashboard de SEO otimizado",
                "Exemplo de meta tags estruturadas",
            ]),
            internal_link_ideas: strings(&[
                "Blog: O que é SEO?",
                "Serviços: Consultoria",
                "Cases de Sucesso",
            ]),
            external_link_ideas: strings(&[
                "Google Search Central",
                "Ahrefs Guide",
                "Moz Beginner Guide",
            ]),
            faq: vec![
                FaqItem {
                    question: "Quanto tempo demora para ver resultados?".into(),
                    answer: "Geralmente entre 3 a 6 meses para estratégias competitivas.".into(),
                },
                FaqItem {
                    question: "O que é LSI?".into(),
                    answer: "Latent Semantic Indexing são termos relacionados ao tópico principal.".into(),
                },
            ],
            search_intent: "Informativa e Educacional".into(),
            target_audience: "Donos de agências, Consultores de Marketing e Blogueiros".into(),
            strategic_plan: vec![
                StrategicTask {
                    phase: "Fase 1: Fundação".into(),
                    task: "Implementar Meta Title e H1 Otimizados conforme Página 2".into(),
                    priority: Priority::Critical,
                },
                StrategicTask {
                    phase: "Fase 2: Autoridade".into(),
                    task: "Adicionar FAQ Schema para capturar Featured Snippets".into(),
                    priority: Priority::High,
                },
                StrategicTask {
                    phase: "Fase 3: Expansão".into(),
                    task: "Iniciar Link Building interno focando nas keywords LSI".into(),
                    priority: Priority::Medium,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        assert_eq!(StrategyResult::sample().validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_first_empty_list() {
        let mut result = StrategyResult::sample();
        result.faq.clear();
        result.strategic_plan.clear();
        assert_eq!(result.validate(), Err("faq"));
    }

    #[test]
    fn test_priority_accepts_wire_and_english_literals() {
        let wire: Priority = serde_json::from_str("\"Crítica\"").unwrap();
        let english: Priority = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(wire, Priority::Critical);
        assert_eq!(english, Priority::Medium);
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"Alta\"");
        assert!(serde_json::from_str::<Priority>("\"Baixa\"").is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut value = serde_json::to_value(StrategyResult::sample()).unwrap();
        value.as_object_mut().unwrap().remove("targetAudience");
        assert!(serde_json::from_value::<StrategyResult>(value).is_err());
    }
}
