//! Configuration for the chat engine.

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::{ChatError, ChatResult};

/// Top-level configuration for the chat engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deferred reply settings.
    pub reply: ReplyConfig,
    /// Conversation title derivation settings.
    pub title: TitleConfig,
    /// Welcome conversation seeding settings.
    pub seed: SeedConfig,
}

impl EngineConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.title.max_chars == 0 {
            return Err(ChatError::InvalidConfig(
                "title.max_chars must be > 0".to_string(),
            ));
        }

        if self.reply.min_delay_ms > self.reply.max_delay_ms {
            return Err(ChatError::InvalidConfig(
                "reply.min_delay_ms must be <= reply.max_delay_ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Deferred reply settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Minimum simulated thinking delay in milliseconds.
    pub min_delay_ms: u64,
    /// Maximum simulated thinking delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 3000,
        }
    }
}

/// Conversation title derivation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Maximum title size in characters before truncation.
    pub max_chars: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self { max_chars: 30 }
    }
}

/// Welcome conversation seeding settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Whether a welcome conversation is seeded at engine creation.
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
