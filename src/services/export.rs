//! # 策略导出服务
//!
//! 将 `StrategyResult` 导出为三种文本格式：
//! - **剪贴板文本**：审计表格"全部复制"，每行 `组件 [标签]:\n内容`，行间空一行
//! - **CSV**：审计表格（Pro 功能），RFC 4180 引号规则
//! - **Markdown 报告**：与可打印报告同结构的六个部分，按白标配置署名

use crate::models::branding::BrandingConfig;
use crate::models::strategy::StrategyResult;
use crate::services::audit::{AuditRow, AuditStatus};

/// 未启用白标时报告使用的署名
const DEFAULT_CONSULTANCY: &str = "Rankify Intelligence Systems";
const DEFAULT_FOOTER: &str = "Rankify AI Strategic Intelligence";

/// 审计表格导出为剪贴板文本
pub fn to_clipboard_text(rows: &[AuditRow]) -> String {
    rows.iter()
        .map(|r| format!("{} [{}]:\n{}", r.component, r.tag, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// CSV 字段转义：包含逗号、引号或换行时整体加引号，内部引号加倍
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn status_label(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Perfect => "Perfeito",
        AuditStatus::Warning => "Atenção",
        AuditStatus::Neutral => "-",
    }
}

/// 审计表格导出为 CSV（含表头，CRLF 换行）
pub fn to_csv(rows: &[AuditRow]) -> String {
    let mut lines = vec!["Componente,Tag,Critério,Conteúdo,Impacto,Status".to_string()];
    for r in rows {
        let fields = [r.component, r.tag, r.criteria, r.content.as_str(), r.impact, status_label(r.status)];
        lines.push(fields.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
    }
    let mut csv = lines.join("\r\n");
    csv.push_str("\r\n");
    csv
}

fn bullet_list(lines: &mut Vec<String>, items: &[String]) {
    for item in items {
        lines.push(format!("- {}", item));
    }
    lines.push(String::new());
}

/// 导出 Markdown 策略报告
///
/// # 参数
/// - `result` - 策略结果
/// - `branding` - 生效的白标配置（见 `branding::effective`），`None` 时使用产品署名
/// - `issued_on` - 签发日期文本（由前端按本地格式生成）
pub fn to_markdown_report(result: &StrategyResult, branding: Option<&BrandingConfig>, issued_on: &str) -> String {
    let consultancy = branding.map_or(DEFAULT_CONSULTANCY, |b| b.name.as_str());
    let footer = branding
        .map(|b| b.footer_text.as_str())
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FOOTER);

    let mut lines: Vec<String> = Vec::new();

    // 封面
    lines.push("# Relatório Estratégico de SEO".into());
    lines.push(String::new());
    lines.push(format!("**Blueprint de Ranqueamento:** \"{}\"", result.h1));
    lines.push(String::new());
    lines.push(format!("- Consultoria Responsável: {}", consultancy));
    if let Some(b) = branding {
        if !b.contact_email.is_empty() {
            lines.push(format!("- Contato: {}", b.contact_email));
        }
        if !b.website_url.is_empty() {
            lines.push(format!("- Site: {}", b.website_url));
        }
    }
    lines.push(format!("- Data de Emissão: {}", issued_on));
    lines.push(format!("- Intenção de Busca: {}", result.search_intent));
    lines.push(format!("- Público-alvo: {}", result.target_audience));
    lines.push(String::new());

    lines.push("## 01. Metadados e URL".into());
    lines.push(String::new());
    lines.push(format!("**Título da Página (Meta Title):** {}", result.title_tag));
    lines.push(String::new());
    lines.push(format!("**Meta Descrição:** {}", result.meta_description));
    lines.push(String::new());
    lines.push(format!("**Slug:** `/{}`", result.slug));
    lines.push(String::new());
    lines.push(format!("**H1:** {}", result.h1));
    lines.push(String::new());

    lines.push("## 02. Estrutura e Semântica".into());
    lines.push(String::new());
    lines.push("### Outline de Conteúdo".into());
    lines.push(String::new());
    for (idx, topic) in result.content_topic_suggestions.iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, topic));
    }
    lines.push(String::new());
    lines.push("### Palavras Secundárias".into());
    lines.push(String::new());
    bullet_list(&mut lines, &result.secondary_keywords);
    lines.push("### Textos Alternativos de Imagem".into());
    lines.push(String::new());
    bullet_list(&mut lines, &result.image_alt_suggestions);

    lines.push("## 03. Autoridade e FAQ".into());
    lines.push(String::new());
    lines.push("### Links Internos".into());
    lines.push(String::new());
    bullet_list(&mut lines, &result.internal_link_ideas);
    lines.push("### Links Externos".into());
    lines.push(String::new());
    bullet_list(&mut lines, &result.external_link_ideas);
    lines.push("### Featured Snippets (FAQ)".into());
    lines.push(String::new());
    for item in &result.faq {
        lines.push(format!("**{}**", item.question));
        lines.push(String::new());
        lines.push(item.answer.clone());
        lines.push(String::new());
    }

    lines.push("## 04. Plano Estratégico".into());
    lines.push(String::new());
    for (idx, step) in result.strategic_plan.iter().enumerate() {
        lines.push(format!(
            "{}. **{}** (Prioridade {}): {}",
            idx + 1,
            step.phase,
            step.priority.as_str(),
            step.task
        ));
    }
    lines.push(String::new());
    lines.push("### KPIs para Monitoramento".into());
    lines.push(String::new());
    lines.push("- Visibilidade: Impressões Google".into());
    lines.push("- Interação: CTR Orgânico".into());
    lines.push("- Conversão: Tráfego Qualificado".into());
    lines.push(String::new());

    lines.push("## 05. Manual de Implementação".into());
    lines.push(String::new());
    lines.push("1. **Meta Dados:** copie e cole os metadados da seção 01 nas configurações de SEO do seu site.".into());
    lines.push("2. **Conteúdo:** estruture a página seguindo o outline e as palavras secundárias da seção 02.".into());
    lines.push("3. **FAQ:** publique as perguntas da seção 03 com marcação FAQ Schema.".into());
    lines.push("4. **Execução:** siga as fases do plano estratégico na ordem de prioridade.".into());
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());
    lines.push(format!("_{}_", footer));

    lines.join("\n")
}
