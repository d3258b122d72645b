//! WanderBot: an in-app travel assistant.
//!
//! A [`session::ChatSession`] persists a per-user conversation through a
//! [`store::MessageStore`] and asks an [`assistant::ReplyGenerator`] for each
//! reply. The generator walks an ordered chain of LLM providers and always
//! produces text, falling back to fixed guidance when none answer.

pub mod assistant;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod store;
pub mod travel;

pub use error::{Result, WanderbotError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::assistant::{ReplyGenerator, ScriptedGateway};
    pub use crate::config::WanderbotConfig;
    pub use crate::error::{Result, WanderbotError};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::{CompletionConfig, LlmBroker, LlmGateway, LlmMessage, MessageRole};
    pub use crate::session::{ChatSession, ConversationTurn, SessionState};
    pub use crate::store::{ChatMessage, ChatRole, Identity, InMemoryMessageStore, MessageStore, UserId};
    pub use crate::travel::TravelStore;
}
