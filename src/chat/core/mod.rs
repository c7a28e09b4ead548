//! Core chat types and identifiers.

pub mod config;
pub mod conversation;
pub mod errors;
pub mod ids;
pub mod message;

pub use config::{EngineConfig, ReplyConfig, SeedConfig, TitleConfig};
pub use conversation::Conversation;
pub use errors::{ChatError, ChatResult};
pub use ids::{ConversationId, MessageId};
pub use message::{Attachment, Message, Sender};
