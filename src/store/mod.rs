//! Per-user chat message storage.
//!
//! Every operation is scoped to the calling [`Identity`]; an anonymous caller
//! is rejected before any data is read or written.

pub mod memory;

use crate::error::{Result, WanderbotError};
use crate::llm::{LlmMessage, MessageRole};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use memory::InMemoryMessageStore;

/// Identifier of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Store-assigned identifier of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

/// Who is calling a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(UserId),
}

impl Identity {
    /// The authenticated owner, or `Unauthenticated`.
    pub fn owner(&self) -> Result<UserId> {
        match self {
            Identity::User(id) => Ok(*id),
            Identity::Anonymous => Err(WanderbotError::Unauthenticated),
        }
    }
}

impl From<UserId> for Identity {
    fn from(id: UserId) -> Self {
        Identity::User(id)
    }
}

/// Author of a stored chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl From<ChatRole> for MessageRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        }
    }
}

/// A persisted chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub owner: UserId,
    pub text: String,
    pub role: ChatRole,
    pub created_at: DateTime<Utc>,
    pub sequence: u64,
}

impl From<&ChatMessage> for LlmMessage {
    fn from(message: &ChatMessage) -> Self {
        LlmMessage::new(message.role.into(), message.text.clone())
    }
}

/// Durable, per-owner ordered log of chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// All messages owned by the caller, oldest first.
    async fn list_messages(&self, identity: &Identity) -> Result<Vec<ChatMessage>>;

    /// Append a message for the caller and return it as stored.
    async fn append_message(
        &self,
        identity: &Identity,
        text: &str,
        role: ChatRole,
    ) -> Result<ChatMessage>;

    /// Delete every message owned by the caller. All or nothing.
    async fn clear_messages(&self, identity: &Identity) -> Result<()>;
}
