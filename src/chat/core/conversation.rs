//! Conversation model and title/preview derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::ConversationId;
use crate::chat::core::message::Message;

/// Placeholder title for a conversation created without a first message.
pub const PLACEHOLDER_TITLE: &str = "Nouvelle conversation";

/// Placeholder preview for a conversation that has no messages yet.
pub const PLACEHOLDER_PREVIEW: &str = "Conversation démarrée";

/// Title of the seeded welcome conversation.
pub const WELCOME_TITLE: &str = "Bienvenue ! Comment puis-je vous aider ?";

/// Preview of the seeded welcome conversation.
pub const WELCOME_PREVIEW: &str = "Bonjour ! Je suis votre assistant ChatBot.";

/// Greeting text of the seeded welcome message.
pub const WELCOME_MESSAGE: &str =
    "Bonjour ! Je suis votre assistant ChatBot. Comment puis-je vous aider aujourd'hui ?";

/// Marker appended to truncated titles.
const TITLE_ELLIPSIS: &str = "...";

/// A titled, ordered thread of messages with a stable identifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier, stable for the conversation's lifetime.
    pub id: ConversationId,
    /// Display label, derived once at creation and never recomputed.
    pub title: String,
    /// Cached preview of the most recently appended message.
    pub last_message: String,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
    /// Ordered message thread; insertion order is chronological order.
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Pure constructor: an empty conversation with placeholder labels.
    ///
    /// No side effects on existing state; the caller decides whether and
    /// when to insert the result into the store.
    #[must_use]
    pub fn started(now: DateTime<Utc>) -> Self {
        Self {
            id: ConversationId::new(),
            title: PLACEHOLDER_TITLE.to_string(),
            last_message: PLACEHOLDER_PREVIEW.to_string(),
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// The seeded welcome conversation holding a single bot greeting.
    #[must_use]
    pub fn welcome(now: DateTime<Utc>) -> Self {
        Self {
            id: ConversationId::new(),
            title: WELCOME_TITLE.to_string(),
            last_message: WELCOME_PREVIEW.to_string(),
            updated_at: now,
            messages: vec![Message::bot(WELCOME_MESSAGE)],
        }
    }

    /// Append a message and refresh the cached preview and timestamp.
    pub fn record(&mut self, message: Message) {
        self.last_message = message.preview();
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }
}

/// Derive a display title from the first characters of `source`.
///
/// Appends an ellipsis marker only when the source exceeds `max_chars`.
#[must_use]
pub fn derive_title(source: &str, max_chars: usize) -> String {
    let mut title: String = source.chars().take(max_chars).collect();
    if source.chars().count() > max_chars {
        title.push_str(TITLE_ELLIPSIS);
    }
    title
}
