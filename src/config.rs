//! Environment-driven configuration.
//!
//! Only the provider credential changes what users see: without it every
//! reply is the offline guidance text. Everything else tunes where and how
//! providers are called.

use crate::error::{Result, WanderbotError};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const ENDPOINT_VAR: &str = "OPENROUTER_API_ENDPOINT";
pub const PRIMARY_MODEL_VAR: &str = "WANDERBOT_PRIMARY_MODEL";
pub const SECONDARY_MODEL_VAR: &str = "WANDERBOT_SECONDARY_MODEL";
pub const TIMEOUT_VAR: &str = "WANDERBOT_TIMEOUT_SECS";

/// Runtime configuration for WanderBot.
#[derive(Clone)]
pub struct WanderbotConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub primary_model: String,
    pub secondary_model: String,
    pub request_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: usize,
    pub top_p: f32,
    pub referer: String,
    pub title: String,
}

impl Default for WanderbotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            primary_model: "anthropic/claude-3.5-sonnet".to_string(),
            secondary_model: "openai/gpt-4-turbo".to_string(),
            request_timeout: Duration::from_secs(30),
            temperature: 0.7,
            max_tokens: 800,
            top_p: 1.0,
            referer: "https://beyond-borders.app".to_string(),
            title: "Beyond Borders Travel App".to_string(),
        }
    }
}

// The credential must never show up in logs.
impl std::fmt::Debug for WanderbotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WanderbotConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("primary_model", &self.primary_model)
            .field("secondary_model", &self.secondary_model)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl WanderbotConfig {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank =
            |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let request_timeout = match non_blank(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    WanderbotError::ConfigError(format!(
                        "{} must be a whole number of seconds, got {:?}",
                        TIMEOUT_VAR, raw
                    ))
                })?;
                if secs == 0 {
                    return Err(WanderbotError::ConfigError(format!(
                        "{} must be greater than zero",
                        TIMEOUT_VAR
                    )));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let config = Self {
            api_key: non_blank(API_KEY_VAR),
            base_url: non_blank(ENDPOINT_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            primary_model: non_blank(PRIMARY_MODEL_VAR).unwrap_or(defaults.primary_model),
            secondary_model: non_blank(SECONDARY_MODEL_VAR).unwrap_or(defaults.secondary_model),
            request_timeout,
            ..Self::default()
        };

        debug!(config = ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Attribution headers sent with every provider request.
    pub fn attribution_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            ("HTTP-Referer".to_string(), self.referer.clone()),
            ("X-Title".to_string(), self.title.clone()),
        ])
    }
}
