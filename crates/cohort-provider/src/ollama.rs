//! Ollama HTTP client.
//!
//! Talks to the non-streaming `/api/generate`, `/api/chat` and `/api/tags`
//! endpoints. Every call carries its own timeout so a stuck backend turns
//! into an ordinary error.

use crate::error::ProviderError;
use crate::traits::InferenceBackend;
use crate::types::{ChatCompletion, ChatMessage, RemoteModel};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Connection settings for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Timeout for `/api/generate` (warm-up and load probes).
    pub generate_timeout: Duration,
    /// Timeout for `/api/chat`.
    pub chat_timeout: Duration,
    /// Timeout for `/api/tags`.
    pub tags_timeout: Duration,
    /// Timeout for the health probe.
    pub health_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generate_timeout: Duration::from_secs(60),
            chat_timeout: Duration::from_secs(300),
            tags_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(5),
        }
    }
}

/// Client for an Ollama-compatible inference service.
#[derive(Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Client with default timeouts for the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(OllamaConfig {
            base_url: base_url.into(),
            ..OllamaConfig::default()
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn generate_body(model: &str, prompt: &str) -> Value {
        json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
        })
    }

    fn chat_body(model: &str, messages: &[ChatMessage]) -> Value {
        json!({
            "model": model,
            "messages": messages,
            "stream": false,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, ProviderError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Api(format!("HTTP {status}: {body}")));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn parse_chat(data: Value) -> Result<ChatCompletion, ProviderError> {
        let resp: OllamaChatResponse = serde_json::from_value(data)?;
        Ok(ChatCompletion {
            content: resp.message.content,
            prompt_tokens: resp.prompt_eval_count,
            completion_tokens: resp.eval_count,
        })
    }

    fn parse_tags(data: Value) -> Result<Vec<RemoteModel>, ProviderError> {
        let resp: OllamaTagsResponse = serde_json::from_value(data)?;
        Ok(resp.models)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let data = self
            .post_json(
                "/api/generate",
                &Self::generate_body(model, prompt),
                self.config.generate_timeout,
            )
            .await?;
        Ok(data["response"].as_str().unwrap_or_default().to_string())
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletion, ProviderError> {
        tracing::debug!(model, messages = messages.len(), "chat request");
        let data = self
            .post_json(
                "/api/chat",
                &Self::chat_body(model, messages),
                self.config.chat_timeout,
            )
            .await?;
        Self::parse_chat(data)
    }

    async fn list_models(&self) -> Result<Vec<RemoteModel>, ProviderError> {
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(self.config.tags_timeout)
            .send()
            .await?;
        Self::parse_tags(Self::read_json(response).await?)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(self.config.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "ollama health check failed");
                false
            }
        }
    }
}

// — Ollama response types for deserialization —

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: u64,
    #[serde(default)]
    eval_count: u64,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OllamaClient::with_base_url("http://ollama:11434/");
        assert_eq!(client.endpoint("/api/chat"), "http://ollama:11434/api/chat");
    }

    #[test]
    fn test_default_config() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.chat_timeout, Duration::from_secs(300));
        assert_eq!(config.generate_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_chat_body_is_non_streaming() {
        let body = OllamaClient::chat_body(
            "llama3.2",
            &[ChatMessage::system("be terse"), ChatMessage::user("hi")],
        );
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        let msgs = body["messages"].as_array().unwrap();
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[1]["content"], "hi");
    }

    #[test]
    fn test_generate_body() {
        let body = OllamaClient::generate_body("mistral", "Initialize");
        assert_eq!(body["prompt"], "Initialize");
        assert_eq!(body["stream"], false);
    }

    #[test]
    fn test_parse_chat_token_counts() {
        let data = json!({
            "message": {"role": "assistant", "content": "open ports: 22, 80"},
            "prompt_eval_count": 40,
            "eval_count": 12,
            "done": true
        });
        let completion = OllamaClient::parse_chat(data).unwrap();
        assert_eq!(completion.content, "open ports: 22, 80");
        assert_eq!(completion.prompt_tokens, 40);
        assert_eq!(completion.completion_tokens, 12);
    }

    #[test]
    fn test_parse_chat_missing_counts_default_to_zero() {
        let data = json!({"message": {"role": "assistant", "content": "ok"}});
        let completion = OllamaClient::parse_chat(data).unwrap();
        assert_eq!(completion.total_tokens(), 0);
    }

    #[test]
    fn test_parse_chat_without_message_is_error() {
        let result = OllamaClient::parse_chat(json!({"error": "model not found"}));
        assert!(matches!(result, Err(ProviderError::Serialization(_))));
    }

    #[test]
    fn test_parse_tags() {
        let data = json!({"models": [
            {"name": "llama3.2:latest", "size": 2019393189u64},
            {"name": "qwen2.5:7b"}
        ]});
        let models = OllamaClient::parse_tags(data).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].base_name(), "llama3.2");
        assert_eq!(models[1].size, 0);
    }

    #[tokio::test]
    async fn test_health_check_unreachable_backend() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            health_timeout: Duration::from_millis(500),
            ..OllamaConfig::default()
        });
        assert!(!client.health_check().await);
    }
}
