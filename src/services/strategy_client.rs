//! # 策略请求客户端
//!
//! 给定关键词，调用外部生成式 AI 服务并返回 `StrategyResult`，或返回类型化错误。
//!
//! ## 流程
//! 1. 检查凭据：缺失、为空或为占位值时直接失败（不发起任何网络请求）
//! 2. 构造提示词与固定 schema，经 `GenerativeBackend` 发出请求
//! 3. 将返回文本解析为 JSON 并校验列表非空；任何不符合契约的响应都不会以部分数据返回
//!
//! ## 错误映射
//! | 条件 | 错误 |
//! |------|------|
//! | HTTP 429 / `RESOURCE_EXHAUSTED` | `RateLimited` |
//! | HTTP 403 / `PERMISSION_DENIED` / `API_KEY_INVALID` | `InvalidCredential` |
//! | "User location is not supported" | `RegionRestricted` |
//! | 空响应文本 | `EmptyResponse` |
//! | JSON 解析或契约校验失败 | `MalformedResponse` |
//! | 其它 | `TransportFailure(原始信息)` |
//!
//! 客户端无状态，不做重试，超时由底层 HTTP 客户端决定。

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::models::strategy::StrategyResult;
use crate::services::prompt;

/// 已知的占位凭据值
const PLACEHOLDER_KEYS: [&str; 4] = ["undefined", "YOUR_API_KEY", "PLACEHOLDER_API_KEY", "changeme"];

/// 有效凭据的最小长度
const MIN_KEY_LEN: usize = 10;

/// 生成失败类型
///
/// `Display` 即前端横幅展示的提示文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(
        "A chave de API não foi encontrada. Configure a variável de ambiente 'API_KEY' e reinicie o aplicativo."
    )]
    CredentialMissing,

    #[error("Erro de formatação nos dados gerados pela IA. Por favor, tente novamente.")]
    MalformedResponse,

    #[error("O modelo retornou uma resposta vazia. Tente uma palavra-chave diferente.")]
    EmptyResponse,

    #[error("Limite de requisições atingido (Quota). Aguarde 60 segundos.")]
    RateLimited,

    #[error("Chave de API inválida ou sem permissão. Verifique sua conta no Google AI Studio.")]
    InvalidCredential,

    #[error(
        "A API do Gemini não está disponível na sua região atual (VPN pode ser necessária ou verifique as restrições do Google)."
    )]
    RegionRestricted,

    #[error("{0}")]
    TransportFailure(String),
}

impl GenerationError {
    /// 稳定的错误类型标识，供前端区分处理
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::CredentialMissing => "credentialMissing",
            GenerationError::MalformedResponse => "malformedResponse",
            GenerationError::EmptyResponse => "emptyResponse",
            GenerationError::RateLimited => "rateLimited",
            GenerationError::InvalidCredential => "invalidCredential",
            GenerationError::RegionRestricted => "regionRestricted",
            GenerationError::TransportFailure(_) => "transportFailure",
        }
    }
}

/// 后端（传输层）失败
///
/// `status` 为 HTTP 状态码（连接失败等无响应时为 `None`），
/// `message` 为服务端错误信息或传输层错误描述。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl BackendFailure {
    pub fn new(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// 生成式 AI 后端
///
/// 生产实现见 `services::gemini::GeminiBackend`；测试中替换为假后端。
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// 发送一次结构化生成请求
    ///
    /// # 返回值
    /// - `Ok(Some(text))` - 模型返回的文本
    /// - `Ok(None)` - 请求成功但没有任何文本
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<Option<String>, BackendFailure>;
}

/// 过滤不可用的凭据
///
/// 空白、已知占位值或长度不足 10 的值视为未配置。
pub fn usable_credential(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim();
    if key.len() < MIN_KEY_LEN || PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(key)) {
        return None;
    }
    Some(key.to_string())
}

/// 将后端失败映射为生成错误
pub fn classify_failure(failure: BackendFailure) -> GenerationError {
    let message = failure.message;

    if failure.status == Some(StatusCode::TOO_MANY_REQUESTS)
        || message.contains("429")
        || message.contains("RESOURCE_EXHAUSTED")
    {
        return GenerationError::RateLimited;
    }
    if failure.status == Some(StatusCode::FORBIDDEN)
        || message.contains("403")
        || message.contains("API_KEY_INVALID")
        || message.contains("PERMISSION_DENIED")
    {
        return GenerationError::InvalidCredential;
    }
    if message.contains("User location is not supported") {
        return GenerationError::RegionRestricted;
    }

    if message.trim().is_empty() {
        GenerationError::TransportFailure("Falha na conexão com o motor de IA.".to_string())
    } else {
        GenerationError::TransportFailure(message)
    }
}

/// 策略请求客户端
#[derive(Clone)]
pub struct StrategyClient {
    credential: Option<String>,
    backend: Arc<dyn GenerativeBackend>,
}

impl StrategyClient {
    /// # 参数
    /// - `raw_credential` - 原始凭据值（可能为空或占位值）
    /// - `backend` - 实际发送请求的后端
    pub fn new(raw_credential: Option<&str>, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            credential: usable_credential(raw_credential),
            backend,
        }
    }

    /// 是否已配置可用凭据
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// 为关键词生成 SEO 策略
    ///
    /// 前置条件：`keyword` 去除首尾空白后非空，由调用方保证。
    ///
    /// # 错误
    /// 见模块文档中的错误映射表
    pub async fn generate(&self, keyword: &str) -> Result<StrategyResult, GenerationError> {
        let api_key = self
            .credential
            .as_deref()
            .ok_or(GenerationError::CredentialMissing)?;

        let started = Instant::now();
        let prompt = prompt::build_prompt(keyword);
        let schema = prompt::response_schema();

        let text = self
            .backend
            .generate(api_key, &prompt, &schema)
            .await
            .map_err(|failure| {
                log::error!("SEO 策略生成失败: {:?}", failure);
                classify_failure(failure)
            })?;

        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        let result: StrategyResult = serde_json::from_str(&text).map_err(|e| {
            log::error!("AI 返回的 JSON 无法解析: {}\n{}", e, text);
            GenerationError::MalformedResponse
        })?;

        result.validate().map_err(|field| {
            log::error!("AI 返回的字段 {} 为空", field);
            GenerationError::MalformedResponse
        })?;

        log::info!("关键词 \"{}\" 策略生成完成，耗时 {:?}", keyword, started.elapsed());
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeBackend, TEST_KEY};
    use super::*;

    async fn run(backend: Arc<FakeBackend>) -> Result<StrategyResult, GenerationError> {
        StrategyClient::new(Some(TEST_KEY), backend).generate("café especial").await
    }

    #[test]
    fn test_usable_credential_rejects_placeholders() {
        assert_eq!(usable_credential(None), None);
        assert_eq!(usable_credential(Some("   ")), None);
        assert_eq!(usable_credential(Some("undefined")), None);
        assert_eq!(usable_credential(Some("YOUR_API_KEY")), None);
        assert_eq!(usable_credential(Some("short")), None);
        assert_eq!(usable_credential(Some(" AIzaSy0123456789 ")).as_deref(), Some("AIzaSy0123456789"));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let backend = FakeBackend::with_sample();
        for raw in [None, Some(""), Some("undefined")] {
            let client = StrategyClient::new(raw, backend.clone());
            assert!(!client.has_credential());
            assert_eq!(client.generate("seo").await, Err(GenerationError::CredentialMissing));
        }
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_returns_complete_result() {
        let backend = FakeBackend::with_sample();
        let result = run(backend.clone()).await.unwrap();

        assert_eq!(result, StrategyResult::sample());
        assert_eq!(result.validate(), Ok(()));
        assert_eq!(backend.calls(), 1);
        assert!(backend.last_prompt().unwrap().contains("\"café especial\""));
    }

    #[tokio::test]
    async fn test_unparseable_text_is_malformed() {
        let result = run(FakeBackend::with_text("```json\n{\"titleTag\":")).await;
        assert_eq!(result, Err(GenerationError::MalformedResponse));
    }

    #[tokio::test]
    async fn test_empty_list_is_malformed() {
        let mut value = serde_json::to_value(StrategyResult::sample()).unwrap();
        value["secondaryKeywords"] = serde_json::json!([]);
        let result = run(FakeBackend::with_text(&value.to_string())).await;
        assert_eq!(result, Err(GenerationError::MalformedResponse));
    }

    #[tokio::test]
    async fn test_empty_text_is_empty_response() {
        assert_eq!(run(FakeBackend::replying(Ok(None))).await, Err(GenerationError::EmptyResponse));
        assert_eq!(run(FakeBackend::with_text("  \n")).await, Err(GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_failure_mapping() {
        let cases = [
            (Some(429), "RESOURCE_EXHAUSTED: quota", GenerationError::RateLimited),
            (Some(403), "PERMISSION_DENIED: denied", GenerationError::InvalidCredential),
            (
                Some(400),
                "FAILED_PRECONDITION: User location is not supported for the API use.",
                GenerationError::RegionRestricted,
            ),
            (
                None,
                "error sending request: connection refused",
                GenerationError::TransportFailure("error sending request: connection refused".into()),
            ),
            (
                Some(500),
                "",
                GenerationError::TransportFailure("Falha na conexão com o motor de IA.".into()),
            ),
        ];

        for (status, message, expected) in cases {
            assert_eq!(run(FakeBackend::failing(status, message)).await, Err(expected));
        }
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(GenerationError::RateLimited.kind(), "rateLimited");
        assert_eq!(GenerationError::TransportFailure("x".into()).kind(), "transportFailure");
        assert_eq!(GenerationError::TransportFailure("boom".into()).to_string(), "boom");
    }
}
