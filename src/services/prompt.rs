//! # 提示词与响应 Schema
//!
//! 生成请求由两部分组成：
//! - 嵌入关键词的葡语（巴西）指令文本
//! - 约束模型输出的固定 JSON schema（Gemini `responseSchema` 格式，类型名大写）

use serde_json::{Value, json};

use crate::models::strategy::Priority;

/// 构造生成指令
///
/// 要求：标题 50-60 字符且关键词前置；Meta 描述 140-160 字符带 CTA；
/// 三阶段（Fundação / Autoridade / Expansão）实施计划。
pub fn build_prompt(keyword: &str) -> String {
    format!(
        r#"
    Atue como um estrategista sênior de SEO especializado em Google Search.

    Palavra-chave alvo: "{keyword}"

    Gere uma estratégia completa e um PLANO ESTRATÉGICO DE IMPLEMENTAÇÃO detalhado:
    1. Título da Página (Title Tag): Keyword no início, 50-60 caracteres, focado em CTR.
    2. Meta Descrição: Persuasiva, com gatilhos mentais e CTA, 140-160 caracteres.
    3. Plano Estratégico: Divida em 3 fases (Fundação, Autoridade, Expansão). Para cada fase, sugira uma tarefa técnica ou de conteúdo extremamente prática.

    Importante: Retorne os dados estritamente em Português do Brasil no formato JSON conforme o schema definido.
  "#
    )
}

/// 所有字段名，同时作为 schema 的 `required` 列表
pub const REQUIRED_FIELDS: [&str; 13] = [
    "titleTag",
    "metaDescription",
    "slug",
    "h1",
    "contentTopicSuggestions",
    "secondaryKeywords",
    "imageAltSuggestions",
    "internalLinkIdeas",
    "externalLinkIdeas",
    "faq",
    "searchIntent",
    "targetAudience",
    "strategicPlan",
];

/// 固定的响应 schema
pub fn response_schema() -> Value {
    let string = || json!({ "type": "STRING" });
    let string_list = || json!({ "type": "ARRAY", "items": { "type": "STRING" } });

    json!({
        "type": "OBJECT",
        "properties": {
            "titleTag": string(),
            "metaDescription": string(),
            "slug": string(),
            "h1": string(),
            "contentTopicSuggestions": string_list(),
            "secondaryKeywords": string_list(),
            "imageAltSuggestions": string_list(),
            "internalLinkIdeas": string_list(),
            "externalLinkIdeas": string_list(),
            "faq": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": string(),
                        "answer": string()
                    },
                    "required": ["question", "answer"]
                }
            },
            "searchIntent": string(),
            "targetAudience": string(),
            "strategicPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "phase": {
                            "type": "STRING",
                            "description": "Fase 1: Fundação, Fase 2: Autoridade ou Fase 3: Expansão"
                        },
                        "task": {
                            "type": "STRING",
                            "description": "Ação específica baseada nos dados acima"
                        },
                        "priority": {
                            "type": "STRING",
                            "enum": Priority::WIRE_VALUES
                        }
                    },
                    "required": ["phase", "task", "priority"]
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}
