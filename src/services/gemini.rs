//! # Gemini generateContent 后端
//!
//! `GenerativeBackend` 的生产实现：
//! `POST {api_base}/v1beta/models/{model}:generateContent`，凭据放在 `x-goog-api-key` 请求头。
//!
//! 请求体指定 `responseMimeType: application/json` 并附带固定 `responseSchema`；
//! 响应文本取自 `candidates[0].content.parts[*].text` 的拼接。
//! 非 2xx 响应的错误体形如 `{"error": {"code", "message", "status"}}`，
//! 其 `status` 与 `message` 拼接后交由 `classify_failure` 分类。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::settings::AppSettings;
use crate::services::strategy_client::{BackendFailure, GenerativeBackend};

/// Gemini HTTP 后端
pub struct GeminiBackend {
    client: Client,
    api_base: String,
    model: String,
}

impl GeminiBackend {
    /// 按运行配置创建后端
    ///
    /// # 错误
    /// HTTP 客户端构建失败时返回错误
    pub fn new(settings: &AppSettings) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| format!("Falha ao criar cliente HTTP: {}", e))?;

        Ok(Self {
            client,
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    status: Option<String>,
    /// `google.rpc.ErrorInfo` 等附加信息，无效凭据的 `API_KEY_INVALID` 只出现在 `reason` 中
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

/// 构造请求体
fn request_body<'a>(prompt: &'a str, schema: &'a Value) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        },
    }
}

/// 提取第一个候选的文本；没有任何文本片段时返回 `None`
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let parts = response.candidates.into_iter().next()?.content?.parts;
    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// 将非 2xx 响应体转换为可分类的错误信息
///
/// 形如 `STATUS: message [REASON, ...]`；错误体无法解析时原样保留响应文本。
fn error_message(body: &str) -> String {
    let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return body.trim().to_string();
    };

    let mut message = match error.status {
        Some(status) => format!("{}: {}", status, error.message),
        None => error.message,
    };
    let reasons: Vec<String> = error.details.into_iter().filter_map(|d| d.reason).collect();
    if !reasons.is_empty() {
        message.push_str(&format!(" [{}]", reasons.join(", ")));
    }
    message
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<Option<String>, BackendFailure> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt, schema))
            .send()
            .await
            .map_err(|e| BackendFailure::new(e.status(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendFailure::new(Some(status), error_message(&body)));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| BackendFailure::new(Some(status), e.to_string()))?;

        Ok(response_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::strategy_client::{GenerationError, classify_failure};
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let schema = json!({ "type": "OBJECT" });
        let body = serde_json::to_value(request_body("olá", &schema)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": "olá" }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        }))
        .unwrap();
        assert_eq!(response_text(response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_without_text_is_none() {
        let blocked: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap();
        assert_eq!(response_text(blocked), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
        assert_eq!(response_text(no_parts), None);
    }

    #[test]
    fn test_error_message_includes_status() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(body), "RESOURCE_EXHAUSTED: Quota exceeded");
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_invalid_key_body_maps_to_invalid_credential() {
        let body = r#"{
          "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [
              {
                "@type": "type.googleapis.com/google.rpc.ErrorInfo",
                "reason": "API_KEY_INVALID",
                "domain": "googleapis.com",
                "metadata": { "service": "generativelanguage.googleapis.com" }
              },
              {
                "@type": "type.googleapis.com/google.rpc.LocalizedMessage",
                "locale": "en-US",
                "message": "API key not valid. Please pass a valid API key."
              }
            ]
          }
        }"#;

        let message = error_message(body);
        assert_eq!(
            message,
            "INVALID_ARGUMENT: API key not valid. Please pass a valid API key. [API_KEY_INVALID]"
        );

        let failure = BackendFailure::new(Some(http::StatusCode::BAD_REQUEST), message);
        assert_eq!(classify_failure(failure), GenerationError::InvalidCredential);
    }

    #[test]
    fn test_region_body_stays_region_restricted() {
        let body = r#"{"error":{"code":400,"message":"User location is not supported for the API use.","status":"FAILED_PRECONDITION"}}"#;
        let failure = BackendFailure::new(Some(http::StatusCode::BAD_REQUEST), error_message(body));
        assert_eq!(classify_failure(failure), GenerationError::RegionRestricted);
    }

    #[test]
    fn test_endpoint_uses_configured_model() {
        let settings = AppSettings::from_lookup(|name| match name {
            "RANKIFY_DATA_DIR" => Some("/tmp/rk".into()),
            "RANKIFY_MODEL" => Some("gemini-test".into()),
            _ => None,
        })
        .unwrap();
        let backend = GeminiBackend::new(&settings).unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
        );
    }
}
