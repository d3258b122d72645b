use super::{ChatMessage, ChatRole, Identity, MessageId, MessageStore, UserId};
use crate::error::{Result, WanderbotError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct StoreState {
    messages: HashMap<UserId, Vec<ChatMessage>>,
    next_sequence: u64,
    last_created_at: Option<DateTime<Utc>>,
}

/// Thread-safe in-process message store.
///
/// Timestamps never go backwards even if the wall clock does; the insertion
/// sequence breaks ties between equal timestamps.
#[derive(Default)]
pub struct InMemoryMessageStore {
    state: Mutex<StoreState>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| WanderbotError::StoreUnavailable("message store lock poisoned".to_string()))
    }

    /// Number of messages held across all owners
    pub fn total_messages(&self) -> Result<usize> {
        Ok(self.lock()?.messages.values().map(Vec::len).sum())
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn list_messages(&self, identity: &Identity) -> Result<Vec<ChatMessage>> {
        let owner = identity.owner()?;
        let state = self.lock()?;
        Ok(state.messages.get(&owner).cloned().unwrap_or_default())
    }

    async fn append_message(
        &self,
        identity: &Identity,
        text: &str,
        role: ChatRole,
    ) -> Result<ChatMessage> {
        let owner = identity.owner()?;
        if text.trim().is_empty() {
            return Err(WanderbotError::EmptyMessage);
        }

        let mut state = self.lock()?;

        let now = Utc::now();
        let created_at = match state.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.last_created_at = Some(created_at);

        let message = ChatMessage {
            id: MessageId(Uuid::new_v4()),
            owner,
            text: text.to_string(),
            role,
            created_at,
            sequence,
        };

        state.messages.entry(owner).or_default().push(message.clone());
        debug!(owner = %owner, role = ?role, sequence, "Appended chat message");

        Ok(message)
    }

    async fn clear_messages(&self, identity: &Identity) -> Result<()> {
        let owner = identity.owner()?;
        let mut state = self.lock()?;
        let removed = state.messages.remove(&owner).map(|m| m.len()).unwrap_or(0);
        info!(owner = %owner, removed, "Cleared chat history");
        Ok(())
    }
}
