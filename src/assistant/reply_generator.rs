//! WanderBot reply generation.
//!
//! The generator maps a new user message plus the prior conversation to a
//! single reply string. Providers are tried in order; whatever goes wrong, the
//! caller always gets displayable text back.

use crate::assistant::prompts::{
    CONNECTIVITY_FALLBACK, EMPTY_REPLY_FALLBACK, OFFLINE_GUIDANCE, SYSTEM_PROMPT,
};
use crate::config::WanderbotConfig;
use crate::error::Result;
use crate::llm::gateways::{OpenAIConfig, OpenAIGateway};
use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces assistant replies from an ordered chain of providers.
///
/// A generator with no providers is offline and answers every message with
/// [`OFFLINE_GUIDANCE`] without touching the network.
pub struct ReplyGenerator {
    providers: Vec<LlmBroker>,
    system_prompt: String,
}

impl ReplyGenerator {
    /// Create a generator that tries `providers` in order.
    pub fn new(providers: Vec<LlmBroker>) -> Self {
        Self {
            providers,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Create a generator with no providers.
    pub fn offline() -> Self {
        Self::new(Vec::new())
    }

    /// Build the primary/secondary chain described by `config`.
    ///
    /// Without a credential the generator is offline.
    pub fn from_config(config: &WanderbotConfig) -> Result<Self> {
        let Some(api_key) = config.api_key.as_deref() else {
            info!("No provider credential configured, WanderBot runs offline");
            return Ok(Self::offline());
        };

        let gateway: Arc<dyn LlmGateway> = Arc::new(
            OpenAIGateway::with_config(OpenAIConfig {
                api_key: api_key.to_string(),
                base_url: config.base_url.clone(),
                timeout: None,
                headers: config.attribution_headers(),
            })?,
        );

        let primary = LlmBroker::new(
            config.primary_model.clone(),
            gateway.clone(),
            Some(CompletionConfig {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
                top_p: Some(config.top_p),
            }),
        )
        .with_timeout(config.request_timeout);

        let secondary = LlmBroker::new(
            config.secondary_model.clone(),
            gateway,
            Some(CompletionConfig {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
                top_p: None,
            }),
        )
        .with_timeout(config.request_timeout);

        Ok(Self::new(vec![primary, secondary]))
    }

    pub fn is_offline(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn providers(&self) -> &[LlmBroker] {
        &self.providers
    }

    /// Assemble the provider request: persona, prior turns, then the new message.
    pub fn build_messages(&self, user_message: &str, history: &[LlmMessage]) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(LlmMessage::system(&self.system_prompt));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .cloned(),
        );
        messages.push(LlmMessage::user(user_message.trim()));
        messages
    }

    /// Generate the assistant's next message.
    ///
    /// Never fails: a missing credential, provider errors, timeouts and
    /// malformed responses all end in a canned reply.
    pub async fn generate_reply(&self, user_message: &str, history: &[LlmMessage]) -> String {
        if self.is_offline() {
            debug!("Offline reply");
            return OFFLINE_GUIDANCE.to_string();
        }

        let messages = self.build_messages(user_message, history);

        for (position, provider) in self.providers.iter().enumerate() {
            match provider.generate(&messages).await {
                Ok(reply) if reply.is_empty() => {
                    warn!(
                        gateway = provider.gateway_name(),
                        model = provider.model(),
                        "Provider returned no content"
                    );
                    return EMPTY_REPLY_FALLBACK.to_string();
                }
                Ok(reply) => {
                    info!(
                        gateway = provider.gateway_name(),
                        model = provider.model(),
                        position,
                        "Reply generated"
                    );
                    return reply;
                }
                Err(e) => {
                    warn!(
                        gateway = provider.gateway_name(),
                        model = provider.model(),
                        position,
                        error = %e,
                        "Provider failed, trying next"
                    );
                }
            }
        }

        warn!("All providers failed, returning connectivity fallback");
        CONNECTIVITY_FALLBACK.to_string()
    }
}
