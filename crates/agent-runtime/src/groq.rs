//! Groq LLM Provider
//!
//! Implementation of `LlmProvider` for Groq's OpenAI-compatible
//! chat-completions API.

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage,
    },
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Default Groq API base (OpenAI-compatible surface)
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq provider configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Bearer token
    pub api_key: String,
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
        }
    }

    /// Point the provider at another OpenAI-compatible endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
    #[serde(default)]
    context_window: Option<u32>,
}

// ============================================================================
// Provider
// ============================================================================

/// Groq LLM provider
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
}

impl GroqProvider {
    /// Create on top of a (possibly shared) HTTP client
    pub const fn new(client: Client, config: GroqConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Map a non-success HTTP status onto the agent error taxonomy
    fn status_error(status: StatusCode, body: String) -> AgentError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(body),
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body),
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                AgentError::ProviderUnavailable(format!("{status}: {body}"))
            }
            _ => AgentError::Provider(format!("{status}: {body}")),
        }
    }

    /// Convert the wire response to an agent completion
    fn convert_completion(response: ChatResponse, model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Parse("completion contained no choices".into()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| AgentError::Parse("first choice has no message content".into()))?;

        Ok(Completion {
            content,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::from_wire),
        })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::status_error(status, body));
        }
        Ok(body)
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Groq health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
        };

        tracing::debug!(model = %options.model, messages = messages.len(), "Requesting completion");

        let body = self
            .get_text(self.client.post(self.endpoint("chat/completions")).json(&request))
            .await?;
        let response: ChatResponse = serde_json::from_str(&body)?;

        Self::convert_completion(response, &options.model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let body = self.get_text(self.client.get(self.endpoint("models"))).await?;
        let list: ModelList = serde_json::from_str(&body)?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ModelInfo {
                id: m.id,
                owned_by: m.owned_by,
                context_length: m.context_window,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, routing::{get, post}};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn provider(base_url: &str) -> GroqProvider {
        GroqProvider::new(Client::new(), GroqConfig::new("test-key").with_base_url(base_url))
    }

    #[test]
    fn test_config_defaults() {
        let config = GroqConfig::new("secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::user("Analyse")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.1,
            max_tokens: None,
            top_p: None,
            stop: &[],
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "m");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Analyse");
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("stop").is_none());
    }

    #[test]
    fn test_no_choices_is_parse_error() {
        let response: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = GroqProvider::convert_completion(response, "m").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice_verbatim() {
        let captured: Arc<Mutex<Option<(Value, Option<String>)>>> = Arc::default();
        let sink = captured.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *sink.lock().unwrap() = Some((body, auth));
                    Json(json!({
                        "model": "served-model",
                        "choices": [
                            { "message": { "role": "assistant", "content": "not json at all" }, "finish_reason": "stop" },
                            { "message": { "role": "assistant", "content": "second" }, "finish_reason": "stop" }
                        ],
                        "usage": { "prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13 }
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let options = GenerationOptions::for_model("llama").with_temperature(0.1);
        let completion = provider(&base).prompt("candles here", &options).await.unwrap();

        assert_eq!(completion.content, "not json at all");
        assert_eq!(completion.model, "served-model");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 13);

        let (body, auth) = captured.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer test-key"));
        assert_eq!(body["model"], "llama");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["content"], "candles here");
        assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let app = Router::new()
            .route(
                "/chat/completions",
                post(|| async { (axum::http::StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
            )
            .route(
                "/models",
                get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );
        let base = serve(app).await;
        let provider = provider(&base);

        let err = provider
            .prompt("x", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::RateLimited(ref body) if body == "quota exceeded"));

        let err = provider.list_models().await.unwrap_err();
        assert!(matches!(err, AgentError::Provider(ref msg) if msg.contains("boom")));
        assert!(!provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_list_models() {
        let app = Router::new().route(
            "/models",
            get(|| async {
                Json(json!({
                    "object": "list",
                    "data": [{ "id": "llama", "owned_by": "Meta", "context_window": 131072 }]
                }))
            }),
        );
        let base = serve(app).await;

        let provider = provider(&base);
        let models = provider.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "llama");
        assert_eq!(models[0].owned_by.as_deref(), Some("Meta"));
        assert_eq!(models[0].context_length, Some(131_072));
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        let err = provider("http://127.0.0.1:9")
            .prompt("x", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
