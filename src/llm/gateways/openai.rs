//! OpenAI-compatible gateway for LLM interactions.
//!
//! Talks to any endpoint that speaks the OpenAI chat-completions protocol,
//! OpenRouter included. Extra headers (OpenRouter's attribution headers, for
//! example) are sent with every request.

use crate::error::{Result, WanderbotError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::openai_messages_adapter::{build_completion_body, extract_reply};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for connecting to an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub headers: HashMap<String, String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout: None,
            headers: HashMap::new(),
        }
    }
}

/// Gateway for OpenAI-compatible chat-completion services.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI-compatible endpoint for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let body = build_completion_body(model, messages, config);

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        for (name, value) in &self.config.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(model = model, status = %status, "Chat completion request rejected");
            return Err(WanderbotError::GatewayError(format!(
                "OpenAI API error: {} - {}",
                status, error_text
            )));
        }

        let text = response.text().await?;
        let response_body: Value = serde_json::from_str(&text)?;

        Ok(LlmGatewayResponse {
            content: extract_reply(&response_body),
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config_default() {
        let config = OpenAIConfig::default();
        assert_eq!(config.api_key, "");
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert!(config.timeout.is_none());
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_gateway_with_api_key_and_base_url() {
        let gateway = OpenAIGateway::with_api_key_and_base_url("key", "https://custom.com").unwrap();
        assert_eq!(gateway.config.api_key, "key");
        assert_eq!(gateway.base_url(), "https://custom.com");
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#)
            .create();

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url()).unwrap();
        let messages = vec![LlmMessage::user("Hi")];
        let config = CompletionConfig::default();

        let result = gateway.complete("gpt-4", &messages, &config).await;

        mock.assert();
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.content, Some("Hello!".to_string()));
    }

    #[tokio::test]
    async fn test_complete_sends_extra_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("x-title", "Beyond Borders Travel App")
            .match_header("http-referer", "https://beyond-borders.app")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create();

        let headers = HashMap::from([
            ("HTTP-Referer".to_string(), "https://beyond-borders.app".to_string()),
            ("X-Title".to_string(), "Beyond Borders Travel App".to_string()),
        ]);
        let gateway = OpenAIGateway::with_config(OpenAIConfig {
            api_key: "test-key".to_string(),
            base_url: server.url(),
            timeout: None,
            headers,
        })
        .unwrap();

        let result = gateway.complete("m", &[LlmMessage::user("Hi")], &CompletionConfig::default()).await;

        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_complete_sends_generation_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"anthropic/claude-3.5-sonnet","max_tokens":800,"top_p":1.0,"messages":[{"role":"user","content":"Hi"}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create();

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url()).unwrap();
        let result = gateway
            .complete("anthropic/claude-3.5-sonnet", &[LlmMessage::user("Hi")], &CompletionConfig::default())
            .await;

        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_complete_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Unauthorized")
            .create();

        let gateway = OpenAIGateway::with_api_key_and_base_url("bad-key", server.url()).unwrap();
        let messages = vec![LlmMessage::user("Hi")];
        let config = CompletionConfig::default();

        let result = gateway.complete("gpt-4", &messages, &config).await;

        mock.assert();
        match result {
            Err(WanderbotError::GatewayError(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Unauthorized"));
            }
            other => panic!("Expected GatewayError, got {:?}", other.map(|r| r.content)),
        }
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url()).unwrap();
        let result = gateway.complete("gpt-4", &[LlmMessage::user("Hi")], &CompletionConfig::default()).await;

        mock.assert();
        assert!(matches!(result, Err(WanderbotError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_complete_empty_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create();

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url()).unwrap();
        let result = gateway.complete("gpt-4", &[LlmMessage::user("Hi")], &CompletionConfig::default()).await;

        mock.assert();
        assert!(result.unwrap().content.is_none());
    }
}
