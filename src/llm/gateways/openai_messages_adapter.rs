//! Adapter for converting LLM messages to OpenAI format.

use crate::llm::gateway::CompletionConfig;
use crate::llm::models::LlmMessage;
use serde_json::{json, Value};

/// Adapt LLM messages to OpenAI format.
pub fn adapt_messages_to_openai(messages: &[LlmMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| {
            json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            })
        })
        .collect()
}

/// Build a chat-completion request body.
///
/// `top_p` is only sent when configured.
pub fn build_completion_body(model: &str, messages: &[LlmMessage], config: &CompletionConfig) -> Value {
    let mut body = json!({
        "model": model,
        "messages": adapt_messages_to_openai(messages),
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
    });

    if let Some(top_p) = config.top_p {
        body["top_p"] = json!(top_p);
    }

    body
}

/// Pull the reply text out of a chat-completion response body.
///
/// Returns `None` when the body has no usable content.
pub fn extract_reply(body: &Value) -> Option<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_preserves_order_and_roles() {
        let messages = vec![
            LlmMessage::system("Be helpful"),
            LlmMessage::user("Hi"),
            LlmMessage::assistant("Hello!"),
            LlmMessage::user("Paris?"),
        ];

        let adapted = adapt_messages_to_openai(&messages);

        assert_eq!(adapted.len(), 4);
        assert_eq!(adapted[0]["role"], "system");
        assert_eq!(adapted[1]["role"], "user");
        assert_eq!(adapted[2]["role"], "assistant");
        assert_eq!(adapted[3]["content"], "Paris?");
    }

    #[test]
    fn test_body_includes_top_p_when_set() {
        let body = build_completion_body("m", &[], &CompletionConfig::default());

        assert_eq!(body["model"], "m");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["top_p"], 1.0);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_body_omits_top_p_when_unset() {
        let config = CompletionConfig {
            top_p: None,
            ..Default::default()
        };
        let body = build_completion_body("m", &[], &config);

        assert!(body.get("top_p").is_none());
    }

    #[test]
    fn test_extract_reply() {
        let body = json!({"choices": [{"message": {"content": "  Hello!  "}}]});
        assert_eq!(extract_reply(&body), Some("Hello!".to_string()));
    }

    #[test]
    fn test_extract_reply_missing_or_blank() {
        assert_eq!(extract_reply(&json!({})), None);
        assert_eq!(extract_reply(&json!({"choices": []})), None);
        assert_eq!(extract_reply(&json!({"choices": [{"message": {"content": null}}]})), None);
        assert_eq!(extract_reply(&json!({"choices": [{"message": {"content": "   "}}]})), None);
    }
}
