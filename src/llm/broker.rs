use crate::error::{Result, WanderbotError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::LlmMessage;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A single chat-completion provider: one gateway, one model, one set of
/// generation parameters.
pub struct LlmBroker {
    model: String,
    gateway: Arc<dyn LlmGateway>,
    config: CompletionConfig,
    timeout: Option<Duration>,
}

impl LlmBroker {
    /// Create a new LLM broker
    pub fn new(
        model: impl Into<String>,
        gateway: Arc<dyn LlmGateway>,
        config: Option<CompletionConfig>,
    ) -> Self {
        Self {
            model: model.into(),
            gateway,
            config: config.unwrap_or_default(),
            timeout: None,
        }
    }

    /// Bound every call made through this broker
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Generate text response from LLM
    ///
    /// Returns the trimmed reply; an empty string means the provider answered
    /// successfully but produced no content.
    pub async fn generate(&self, messages: &[LlmMessage]) -> Result<String> {
        info!(
            gateway = self.gateway.name(),
            model = %self.model,
            message_count = messages.len(),
            "Requesting completion"
        );

        let call = self.gateway.complete(&self.model, messages, &self.config);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                WanderbotError::TimeoutError(format!(
                    "{} did not answer within {:?}",
                    self.model, limit
                ))
            })??,
            None => call.await?,
        };

        let content = response.content.map(|c| c.trim().to_string()).unwrap_or_default();
        debug!(model = %self.model, length = content.len(), "Completion received");

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::models::{LlmGatewayResponse, MessageRole};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock gateway for testing
    struct MockGateway {
        responses: Vec<Option<String>>,
        call_count: Mutex<usize>,
        seen: Mutex<Vec<(String, Vec<LlmMessage>, CompletionConfig)>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Option<String>>) -> Self {
            Self {
                responses,
                call_count: Mutex::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            model: &str,
            messages: &[LlmMessage],
            config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((model.to_string(), messages.to_vec(), config.clone()));

            let mut count = self.call_count.lock().unwrap();
            let idx = *count;
            *count += 1;

            Ok(LlmGatewayResponse {
                content: self.responses.get(idx).cloned().flatten(),
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct SlowGateway;

    #[async_trait]
    impl LlmGateway for SlowGateway {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(LlmGatewayResponse::text("too late"))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_generate_passes_model_messages_and_config() {
        let gateway = Arc::new(MockGateway::new(vec![Some("Hi there".to_string())]));
        let config = CompletionConfig {
            temperature: 0.3,
            max_tokens: 42,
            top_p: None,
        };
        let broker = LlmBroker::new("test-model", gateway.clone(), Some(config.clone()));

        let result = broker.generate(&[LlmMessage::user("Hello")]).await.unwrap();

        assert_eq!(result, "Hi there");
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "test-model");
        assert_eq!(seen[0].1[0].role, MessageRole::User);
        assert_eq!(seen[0].2, config);
    }

    #[tokio::test]
    async fn test_generate_trims_content() {
        let gateway = Arc::new(MockGateway::new(vec![Some("  padded \n".to_string())]));
        let broker = LlmBroker::new("test-model", gateway, None);

        assert_eq!(broker.generate(&[]).await.unwrap(), "padded");
    }

    #[tokio::test]
    async fn test_generate_missing_content_is_empty() {
        let gateway = Arc::new(MockGateway::new(vec![None]));
        let broker = LlmBroker::new("test-model", gateway, None);

        assert_eq!(broker.generate(&[]).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let broker = LlmBroker::new("slow-model", Arc::new(SlowGateway), None)
            .with_timeout(Duration::from_millis(50));

        let result = broker.generate(&[LlmMessage::user("Hello")]).await;

        assert!(matches!(result, Err(WanderbotError::TimeoutError(_))));
    }

    #[test]
    fn test_accessors() {
        let broker = LlmBroker::new("m", Arc::new(MockGateway::new(vec![])), None);
        assert_eq!(broker.model(), "m");
        assert_eq!(broker.gateway_name(), "mock");
        assert_eq!(broker.config(), &CompletionConfig::default());
    }
}
