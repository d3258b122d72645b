//! Chat session management.
//!
//! A [`ChatSession`] coordinates one conversational turn at a time against a
//! shared [`MessageStore`]: persist the user's message, ask the
//! [`ReplyGenerator`] for an answer, persist the answer. It also owns the
//! one-time greeting and the history-clear lifecycle.
//!
//! The store is the only source of truth for history; the session never keeps
//! its own copy beyond what a single operation just read.

use crate::assistant::prompts::GREETING;
use crate::assistant::ReplyGenerator;
use crate::error::{Result, WanderbotError};
use crate::llm::LlmMessage;
use crate::store::{ChatMessage, ChatRole, Identity, MessageStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Greeting lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Loading,
    Empty,
    Populated,
}

/// One user message and the assistant reply persisted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// Releases the in-flight flag when a submission ends, however it ends.
struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A chat session for one authenticated user.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use wanderbot::assistant::ReplyGenerator;
/// use wanderbot::session::ChatSession;
/// use wanderbot::store::{Identity, InMemoryMessageStore, UserId};
///
/// let session = ChatSession::new(
///     Identity::User(UserId::new()),
///     Arc::new(InMemoryMessageStore::new()),
///     Arc::new(ReplyGenerator::offline()),
/// );
///
/// session.open().await?;
/// let turn = session.submit_message("Tell me about Paris").await?;
/// println!("{}", turn.assistant.text);
/// ```
pub struct ChatSession {
    identity: Identity,
    store: Arc<dyn MessageStore>,
    generator: Arc<ReplyGenerator>,
    greeted: AtomicBool,
    submitting: AtomicBool,
    state: Mutex<SessionState>,
}

impl ChatSession {
    pub fn new(
        identity: Identity,
        store: Arc<dyn MessageStore>,
        generator: Arc<ReplyGenerator>,
    ) -> Self {
        Self {
            identity,
            store,
            generator,
            greeted: AtomicBool::new(false),
            submitting: AtomicBool::new(false),
            state: Mutex::new(SessionState::Unopened),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_state(&self, next: SessionState) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let current = *state;
        if current != next {
            debug!(from = ?current, to = ?next, "Session state change");
            *state = next;
        }
    }

    /// Whether a message submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Load the history and greet if it is empty.
    ///
    /// Returns the history as it stands after any greeting.
    pub async fn open(&self) -> Result<Vec<ChatMessage>> {
        let previous = self.state();
        self.set_state(SessionState::Loading);

        let history = match self.store.list_messages(&self.identity).await {
            Ok(history) => history,
            Err(e) => {
                self.set_state(previous);
                return Err(e);
            }
        };

        if !history.is_empty() {
            self.set_state(SessionState::Populated);
            return Ok(history);
        }

        self.set_state(SessionState::Empty);
        if self.ensure_greeting().await? {
            return self.store.list_messages(&self.identity).await;
        }
        Ok(history)
    }

    /// Current history, oldest first.
    pub async fn history(&self) -> Result<Vec<ChatMessage>> {
        self.store.list_messages(&self.identity).await
    }

    /// Append the greeting once per session lifetime, and only to an empty history.
    ///
    /// Safe to call repeatedly and concurrently with itself. Returns whether a
    /// greeting was appended. If the store fails the flag is released so the
    /// next call retries.
    pub async fn ensure_greeting(&self) -> Result<bool> {
        if self
            .greeted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }

        let history = match self.store.list_messages(&self.identity).await {
            Ok(history) => history,
            Err(e) => {
                self.greeted.store(false, Ordering::Release);
                warn!(error = %e, "Could not check history before greeting");
                return Err(e);
            }
        };

        if !history.is_empty() {
            self.set_state(SessionState::Populated);
            return Ok(false);
        }

        match self.store.append_message(&self.identity, GREETING, ChatRole::Assistant).await {
            Ok(_) => {
                info!("Greeted new session");
                self.set_state(SessionState::Populated);
                Ok(true)
            }
            Err(e) => {
                self.greeted.store(false, Ordering::Release);
                warn!(error = %e, "Greeting could not be saved, will retry");
                Err(e)
            }
        }
    }

    /// Run one conversational turn.
    ///
    /// Fails only when the input is blank, another submission is in flight, or
    /// the store rejects a write. Reply generation itself never fails.
    pub async fn submit_message(&self, text: &str) -> Result<ConversationTurn> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WanderbotError::EmptyMessage);
        }

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejected re-entrant submission");
            return Err(WanderbotError::SubmissionInFlight);
        }
        let _guard = SubmissionGuard(&self.submitting);

        let snapshot: Vec<LlmMessage> = self
            .store
            .list_messages(&self.identity)
            .await?
            .iter()
            .map(LlmMessage::from)
            .collect();

        let user = self.store.append_message(&self.identity, text, ChatRole::User).await?;
        self.set_state(SessionState::Populated);

        let reply = self.generator.generate_reply(text, &snapshot).await;

        let assistant =
            self.store.append_message(&self.identity, &reply, ChatRole::Assistant).await?;

        info!(history_len = snapshot.len() + 2, "Turn completed");
        Ok(ConversationTurn { user, assistant })
    }

    /// Delete the whole history and allow the greeting to fire again.
    pub async fn clear_session(&self) -> Result<()> {
        self.store.clear_messages(&self.identity).await?;
        self.greeted.store(false, Ordering::Release);
        self.set_state(SessionState::Empty);
        info!("Chat history cleared");
        Ok(())
    }
}
