//! OpenAI-compatible structured-output client.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, and any endpoint exposing
//! `/chat/completions` with `response_format: {"type": "json_schema"}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinkact_core::error::ProviderError;
use thinkact_core::message::ChatMessage;
use thinkact_core::provider::{ModelClient, ResponseFormat};
use tracing::{debug, warn};

const DEFAULT_MODEL: &str = "gpt-4.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A model client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatClient {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    /// Applied to every request.
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new OpenAI-compatible client.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Create an OpenAI client (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an OpenRouter client (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key)
    }

    /// Create an Ollama client (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Self {
        // Ollama doesn't need a key
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "",
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_body<'a>(
        &'a self,
        history: &'a [ChatMessage],
        format: &'a ResponseFormat,
    ) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: history
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            response_format: ApiResponseFormat {
                r#type: "json_schema",
                json_schema: ApiJsonSchema {
                    name: &format.name,
                    description: &format.description,
                    schema: &format.schema,
                    strict: format.strict,
                },
            },
            temperature: self.temperature,
        }
    }

    /// Pull the JSON text out of a completion.
    fn extract_content(response: ApiResponse) -> Result<String, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        if let Some(refusal) = choice.message.refusal {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!("Model refused: {refusal}"),
            });
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ProviderError::ApiError {
                status_code: 200,
                message: format!(
                    "Empty content in response (finish_reason: {})",
                    choice.finish_reason.as_deref().unwrap_or("unknown")
                ),
            }),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn structured_chat(
        &self,
        history: &[ChatMessage],
        format: &ResponseFormat,
    ) -> std::result::Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(history, format);

        debug!(
            provider = %self.name,
            model = %self.model,
            schema = %format.name,
            messages = history.len(),
            "Sending structured completion request"
        );

        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            return Err(ProviderError::ModelNotFound(self.model.clone()));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::extract_content(api_response)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    response_format: ApiResponseFormat<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat<'a> {
    r#type: &'static str,
    json_schema: ApiJsonSchema<'a>,
}

#[derive(Debug, Serialize)]
struct ApiJsonSchema<'a> {
    name: &'a str,
    description: &'a str,
    schema: &'a serde_json::Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn thought_format() -> ResponseFormat {
        ResponseFormat::strict(
            "thought",
            "Think about the next step",
            json!({"type": "object", "properties": {"thought": {"type": "string"}}}),
        )
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "model": "gpt-4.1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content, "refusal": null},
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn openrouter_constructor() {
        let client = OpenAiCompatClient::openrouter("sk-test");
        assert_eq!(client.name(), "openrouter");
        assert!(client.base_url().contains("openrouter.ai"));
    }

    #[test]
    fn ollama_constructor() {
        let client = OpenAiCompatClient::ollama(None);
        assert_eq!(client.name(), "ollama");
        assert!(client.base_url().contains("localhost:11434"));
        assert!(client.api_key.is_empty());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = OpenAiCompatClient::new("custom", "http://localhost:8000/v1/", "k");
        assert_eq!(client.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn request_body_carries_history_and_schema() {
        let client = OpenAiCompatClient::openai("sk-test").with_model("gpt-4.1-mini");
        let history = vec![ChatMessage::system("rules"), ChatMessage::user("hi")];
        let body = serde_json::to_value(client.request_body(&history, &thought_format())).unwrap();

        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "rules"}));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "thought");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn temperature_included_when_set() {
        let client = OpenAiCompatClient::openai("sk-test").with_temperature(Some(0.5));
        let body = serde_json::to_value(client.request_body(&[], &thought_format())).unwrap();
        assert_eq!(body["temperature"], json!(0.5));
    }

    #[test]
    fn extract_content_rejects_empty_choices() {
        let response: ApiResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = OpenAiCompatClient::extract_content(response).unwrap_err();
        assert!(err.to_string().contains("No choices"));
    }

    #[test]
    fn extract_content_rejects_refusal() {
        let response: ApiResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "refusal": "I can't help"}, "finish_reason": "stop"}]
        }))
        .unwrap();
        let err = OpenAiCompatClient::extract_content(response).unwrap_err();
        assert!(err.to_string().contains("refused"));
    }

    #[tokio::test]
    async fn structured_chat_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"response_format": {"type": "json_schema"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"thought":"hm"}"#)))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new("openai", server.uri(), "sk-test");
        let raw = client
            .structured_chat(&[ChatMessage::user("hi")], &thought_format())
            .await
            .unwrap();
        assert_eq!(raw, r#"{"thought":"hm"}"#);
    }

    #[tokio::test]
    async fn status_codes_map_to_provider_errors() {
        let cases = [
            (429, "rate"),
            (401, "auth"),
            (404, "model"),
            (500, "api"),
        ];

        for (status, kind) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(status).set_body_string("boom"))
                .mount(&server)
                .await;

            let client = OpenAiCompatClient::new("openai", server.uri(), "sk-test");
            let err = client
                .structured_chat(&[ChatMessage::user("hi")], &thought_format())
                .await
                .unwrap_err();

            match (kind, err) {
                ("rate", ProviderError::RateLimited { retry_after_secs }) => {
                    assert_eq!(retry_after_secs, 5)
                }
                ("auth", ProviderError::AuthenticationFailed(_)) => {}
                ("model", ProviderError::ModelNotFound(model)) => assert_eq!(model, "gpt-4.1"),
                ("api", ProviderError::ApiError { status_code, message }) => {
                    assert_eq!(status_code, 500);
                    assert_eq!(message, "boom");
                }
                (kind, other) => panic!("status {status}: expected {kind}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn configured_timeout_applies_to_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"thought":"late"}"#))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new("openai", server.uri(), "sk-test")
            .with_timeout(Duration::from_millis(100));
        assert_eq!(client.timeout(), Duration::from_millis(100));

        let err = client
            .structured_chat(&[ChatMessage::user("hi")], &thought_format())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)), "got {err:?}");
    }
}
