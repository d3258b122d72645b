use serde::{Deserialize, Serialize};

/// Message role in LLM conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name used by OpenAI-compatible providers
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Message in LLM conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    #[serde(default = "default_role")]
    pub role: MessageRole,
    pub content: String,
}

fn default_role() -> MessageRole {
    MessageRole::User
}

/// Response from LLM gateway
#[derive(Debug, Clone, Default)]
pub struct LlmGatewayResponse {
    pub content: Option<String>,
}

impl LlmGatewayResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

impl LlmMessage {
    /// Create a message with an explicit role
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_message_role_as_str_matches_serde() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let quoted = format!("\"{}\"", role.as_str());
            assert_eq!(serde_json::to_string(&role).unwrap(), quoted);
        }
    }

    #[test]
    fn test_constructors() {
        assert_eq!(LlmMessage::user("Hello").role, MessageRole::User);
        assert_eq!(LlmMessage::system("Be brief").role, MessageRole::System);

        let msg = LlmMessage::assistant("I can help with that");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "I can help with that");
    }

    #[test]
    fn test_llm_message_serialization() {
        let msg = LlmMessage::user("test content");
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"test content\""));
    }

    #[test]
    fn test_llm_message_default_role() {
        let json = r#"{"content":"test"}"#;
        let msg: LlmMessage = serde_json::from_str(json).unwrap();

        // Should default to User role
        assert_eq!(msg.role, MessageRole::User);
    }

    #[test]
    fn test_gateway_response_text() {
        let response = LlmGatewayResponse::text("Bonjour");
        assert_eq!(response.content.as_deref(), Some("Bonjour"));
        assert!(LlmGatewayResponse::default().content.is_none());
    }
}
