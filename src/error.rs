//! Error types and result aliases for the WanderBot library.
//!
//! This module defines the core error type [`WanderbotError`] and the [`Result`] type alias
//! used throughout the library. Provider failures are only ever seen inside the reply
//! generator; store and session failures are the ones that reach callers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WanderbotError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{0} not found or access denied")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("A message is already being sent for this session")]
    SubmissionInFlight,
}

impl WanderbotError {
    /// Whether this failure is transient and the user may simply retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WanderbotError::StoreUnavailable(_)
                | WanderbotError::SubmissionInFlight
                | WanderbotError::TimeoutError(_)
                | WanderbotError::HttpError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WanderbotError>;
