//! Chat subsystem: the conversation store and its simulated responder.
//!
//! The subsystem is organized into:
//! - `core`: Configuration, errors, IDs, messages, and conversations
//! - `responder`: Reply composition and delay strategy (randomness seam)
//! - `engine`: The conversation store and its command/query surface

pub mod core;
pub mod engine;
pub mod responder;

// Re-export commonly used types for convenience
pub use self::core::{
    Attachment, ChatError, ChatResult, Conversation, ConversationId, EngineConfig, Message,
    MessageId, ReplyConfig, SeedConfig, Sender, TitleConfig,
};
pub use engine::ChatEngine;
pub use responder::{Responder, SimulatedResponder};
