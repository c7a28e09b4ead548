//! Message model for the conversation store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chat::core::ids::MessageId;

/// Originator of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Human input.
    User,
    /// Simulated assistant response.
    Bot,
}

impl Sender {
    /// Stable string form for display and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "bot" => Ok(Self::Bot),
            _ => Err(value.to_string()),
        }
    }
}

/// File metadata attached to a user message.
///
/// The engine treats the content reference as opaque; the bytes are never
/// read or validated here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name.
    pub name: String,
    /// MIME type reported by the file picker.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Locally-resolvable reference to the file bytes (e.g. a blob handle).
    pub content_url: String,
}

impl Attachment {
    /// Build an attachment from file-picker metadata.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        content_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            content_url: content_url.into(),
        }
    }
}

/// One utterance by either the user or the simulated assistant.
///
/// Messages are append-only: never edited or deleted after creation.
/// Invariant: `text` is non-empty OR `attachment` is present.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, creation-time ordered identifier.
    pub id: MessageId,
    /// Message text; may be empty only when an attachment is present.
    pub text: String,
    /// Originator of the message.
    pub sender: Sender,
    /// Creation instant, serialized as an ISO-8601 string.
    pub timestamp: DateTime<Utc>,
    /// Optional file attachment, user messages only.
    pub attachment: Option<Attachment>,
}

impl Message {
    /// Build a user message, optionally carrying an attachment.
    #[must_use]
    pub fn user(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            attachment,
        }
    }

    /// Build a bot message.
    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            attachment: None,
        }
    }

    /// Preview string for conversation listings.
    ///
    /// Mirrors the message text, or marks the attachment by name when the
    /// message carries no text.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.text.is_empty() {
            let name = self
                .attachment
                .as_ref()
                .map(|attachment| attachment.name.as_str())
                .unwrap_or_default();
            format!("📎 {name}")
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_roundtrip() {
        for sender in [Sender::User, Sender::Bot] {
            assert_eq!(Sender::from_str(sender.as_str()), Ok(sender));
        }
    }

    #[test]
    fn test_user_message_carries_attachment() {
        let attachment = Attachment::new("notes.pdf", "application/pdf", 2048, "blob:notes");
        let message = Message::user("", Some(attachment.clone()));
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.attachment, Some(attachment));
    }

    #[test]
    fn test_preview_prefers_text() {
        let message = Message::user("Bonjour", None);
        assert_eq!(message.preview(), "Bonjour");
    }

    #[test]
    fn test_preview_marks_attachment_by_name() {
        let attachment = Attachment::new("photo.png", "image/png", 512, "blob:photo");
        let message = Message::user("", Some(attachment));
        assert_eq!(message.preview(), "📎 photo.png");
    }

    #[test]
    fn test_bot_message_has_no_attachment() {
        let message = Message::bot("Bonjour !");
        assert_eq!(message.sender, Sender::Bot);
        assert!(message.attachment.is_none());
    }
}
