//! The conversation store: commands, queries, and deferred replies.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::chat::core::config::EngineConfig;
use crate::chat::core::conversation::{Conversation, derive_title};
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::ConversationId;
use crate::chat::core::message::{Attachment, Message};
use crate::chat::responder::{Responder, SimulatedResponder};

/// Owned store state: the conversation list and the active selection.
///
/// `conversations` is ordered most-recent-first. `active_id` is a
/// non-owning reference; deletion reconciles it in the same mutation.
#[derive(Debug, Default)]
struct StoreState {
    conversations: Vec<Conversation>,
    active_id: Option<ConversationId>,
}

impl StoreState {
    fn find_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|conversation| conversation.id == id)
    }
}

/// In-memory conversation store with simulated deferred replies.
///
/// All mutations are discrete critical sections under one lock; deferred
/// replies are fire-and-forget tasks that re-resolve their conversation by
/// id at completion time and tolerate its absence.
#[derive(Clone)]
pub struct ChatEngine {
    config: EngineConfig,
    responder: Arc<dyn Responder>,
    state: Arc<RwLock<StoreState>>,
}

impl ChatEngine {
    /// Create a new engine with an injected responder.
    ///
    /// Seeds the welcome conversation when `config.seed.enabled` is set.
    /// Seeding happens once per engine lifetime; deleting every
    /// conversation afterwards does not re-seed.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EngineConfig, responder: Arc<dyn Responder>) -> ChatResult<Self> {
        config.validate()?;

        let mut state = StoreState::default();
        if config.seed.enabled {
            let conversation = Conversation::welcome(Utc::now());
            state.active_id = Some(conversation.id);
            info!("Seeded welcome conversation: {}", conversation.id);
            state.conversations.push(conversation);
        }

        Ok(Self {
            config,
            responder,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create a new engine using the simulated responder.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: EngineConfig) -> ChatResult<Self> {
        let responder = Arc::new(SimulatedResponder::new(config.reply.clone()));
        Self::new(config, responder)
    }

    /// Insert a fresh conversation at the front of the list and select it.
    pub async fn new_conversation(&self) -> Conversation {
        let conversation = Conversation::started(Utc::now());
        let mut guard = self.state.write().await;
        guard.active_id = Some(conversation.id);
        guard.conversations.insert(0, conversation.clone());
        info!("Created new conversation: {}", conversation.id);
        conversation
    }

    /// Select the conversation to display and target with new sends.
    ///
    /// The id is taken as-is: the presentation layer sources ids from this
    /// store's own list, so no existence check is performed.
    pub async fn select_conversation(&self, id: ConversationId) {
        let mut guard = self.state.write().await;
        guard.active_id = Some(id);
        debug!("Switched to conversation: {id}");
    }

    /// Remove the conversation with the given id.
    ///
    /// Idempotent: absent ids are ignored. When the deleted conversation
    /// was active, the selection is cleared in the same mutation.
    pub async fn delete_conversation(&self, id: ConversationId) {
        let mut guard = self.state.write().await;
        let before = guard.conversations.len();
        guard.conversations.retain(|conversation| conversation.id != id);
        if guard.active_id == Some(id) {
            guard.active_id = None;
        }
        if guard.conversations.len() < before {
            info!("Deleted conversation: {id}");
        } else {
            debug!("Delete for unknown conversation {id} ignored");
        }
    }

    /// Append a user message and schedule a simulated reply.
    ///
    /// When no conversation is active, a new one is created, titled from
    /// the first characters of the text (or the attachment name), inserted
    /// at the front, and selected. Exactly one deferred reply is scheduled
    /// per call when the text is non-empty; attachment-only sends get no
    /// reply.
    ///
    /// Returns the appended user message.
    ///
    /// # Errors
    /// Returns `ChatError::InvalidMessage` when both the text and the
    /// attachment are absent.
    pub async fn send_message(
        &self,
        text: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> ChatResult<Message> {
        let text = text.into();
        if text.is_empty() && attachment.is_none() {
            return Err(ChatError::InvalidMessage(
                "a message needs text or an attachment".to_string(),
            ));
        }

        let message = Message::user(text.clone(), attachment);
        let target_id = {
            let mut guard = self.state.write().await;
            let active = guard.active_id;
            match active {
                Some(id) => {
                    // Append in place; the list order of the other
                    // conversations is unaffected.
                    if let Some(conversation) = guard.find_mut(id) {
                        conversation.record(message.clone());
                        debug!("Appended user message to conversation {id}");
                    } else {
                        debug!("Active conversation {id} is stale; message dropped");
                    }
                    id
                }
                None => {
                    let mut conversation = Conversation::started(message.timestamp);
                    let source = if message.text.is_empty() {
                        message
                            .attachment
                            .as_ref()
                            .map(|attachment| attachment.name.as_str())
                            .unwrap_or_default()
                    } else {
                        message.text.as_str()
                    };
                    conversation.title = derive_title(source, self.config.title.max_chars);
                    conversation.record(message.clone());

                    let id = conversation.id;
                    guard.active_id = Some(id);
                    guard.conversations.insert(0, conversation);
                    info!("Created conversation {id} from first message");
                    id
                }
            }
        };

        if !text.is_empty() {
            self.schedule_reply(target_id, text);
        }

        Ok(message)
    }

    /// Snapshot of the conversation list, most-recent-first.
    pub async fn conversations(&self) -> Vec<Conversation> {
        self.state.read().await.conversations.clone()
    }

    /// Identifier of the currently selected conversation, if any.
    pub async fn active_conversation(&self) -> Option<ConversationId> {
        self.state.read().await.active_id
    }

    /// Messages of the active conversation.
    ///
    /// Empty when nothing is selected or the selection is stale.
    pub async fn current_messages(&self) -> Vec<Message> {
        let guard = self.state.read().await;
        let Some(id) = guard.active_id else {
            return Vec::new();
        };
        guard
            .conversations
            .iter()
            .find(|conversation| conversation.id == id)
            .map(|conversation| conversation.messages.clone())
            .unwrap_or_default()
    }

    /// Spawn the deferred reply task for a user message.
    ///
    /// Fire-and-forget, keyed by the conversation id captured at send
    /// time: the reply resolves the conversation by id when the delay
    /// elapses, and silently drops when it was deleted in the interim.
    fn schedule_reply(&self, conversation_id: ConversationId, user_text: String) {
        let state = Arc::clone(&self.state);
        let responder = Arc::clone(&self.responder);
        tokio::spawn(async move {
            let delay = responder.reply_delay();
            tokio::time::sleep(delay).await;

            let reply = Message::bot(responder.compose_reply(&user_text));
            let mut guard = state.write().await;
            match guard.find_mut(conversation_id) {
                Some(conversation) => {
                    conversation.record(reply);
                    debug!("Appended deferred reply to conversation {conversation_id}");
                }
                None => {
                    debug!("Conversation {conversation_id} is gone; reply dropped");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::chat::core::config::SeedConfig;
    use crate::chat::core::conversation::WELCOME_MESSAGE;
    use crate::chat::core::message::Sender;

    /// Deterministic stand-in: fixed delay, echoing reply.
    struct FixedResponder {
        delay_ms: u64,
    }

    impl Responder for FixedResponder {
        fn compose_reply(&self, user_text: &str) -> String {
            format!("réponse à {user_text}")
        }

        fn reply_delay(&self) -> Duration {
            Duration::from_millis(self.delay_ms)
        }
    }

    fn seedless_config() -> EngineConfig {
        EngineConfig {
            seed: SeedConfig { enabled: false },
            ..EngineConfig::default()
        }
    }

    fn seedless_engine(delay_ms: u64) -> ChatResult<ChatEngine> {
        ChatEngine::new(seedless_config(), Arc::new(FixedResponder { delay_ms }))
    }

    #[tokio::test]
    async fn test_seed_welcome_conversation() -> ChatResult<()> {
        let engine = ChatEngine::from_config(EngineConfig::default())?;
        let conversations = engine.conversations().await;
        assert_eq!(conversations.len(), 1);
        assert_eq!(engine.active_conversation().await, Some(conversations[0].id));

        let messages = engine.current_messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Bot);
        assert_eq!(messages[0].text, WELCOME_MESSAGE);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_to_seeded_conversation_echoes_text() -> ChatResult<()> {
        // Production responder: the delay is random within 1000-3000 ms,
        // resolved deterministically through paused virtual time.
        let engine = ChatEngine::from_config(EngineConfig::default())?;
        engine.send_message("Bonjour", None).await?;

        let messages = engine.current_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "Bonjour");

        tokio::time::sleep(Duration::from_millis(3001)).await;
        let messages = engine.current_messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].sender, Sender::Bot);
        assert!(messages[2].text.contains("Bonjour"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_without_active_creates_conversation() -> ChatResult<()> {
        let engine = seedless_engine(1500)?;
        engine.send_message("Bonjour", None).await?;

        let conversations = engine.conversations().await;
        assert_eq!(conversations.len(), 1);
        assert_eq!(engine.active_conversation().await, Some(conversations[0].id));
        assert_eq!(conversations[0].title, "Bonjour");
        assert_eq!(conversations[0].last_message, "Bonjour");
        assert_eq!(conversations[0].messages.len(), 1);

        tokio::time::sleep(Duration::from_millis(1501)).await;
        let conversations = engine.conversations().await;
        assert_eq!(conversations[0].messages.len(), 2);
        assert_eq!(conversations[0].messages[1].sender, Sender::Bot);
        assert_eq!(conversations[0].last_message, "réponse à Bonjour");
        Ok(())
    }

    #[tokio::test]
    async fn test_title_from_first_message_is_truncated() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        engine.send_message("x".repeat(45), None).await?;

        let conversations = engine.conversations().await;
        assert_eq!(conversations[0].title, format!("{}...", "x".repeat(30)));
        Ok(())
    }

    #[tokio::test]
    async fn test_new_conversation_goes_to_front_and_becomes_active() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        let first = engine.new_conversation().await;
        let second = engine.new_conversation().await;

        let conversations = engine.conversations().await;
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].id, second.id);
        assert_eq!(conversations[1].id, first.id);
        assert_eq!(engine.active_conversation().await, Some(second.id));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_keeps_existing_conversation_in_place() -> ChatResult<()> {
        let engine = seedless_engine(500)?;
        let older = engine.new_conversation().await;
        let newer = engine.new_conversation().await;

        engine.select_conversation(older.id).await;
        engine.send_message("toujours là", None).await?;
        tokio::time::sleep(Duration::from_millis(501)).await;

        // Activity on an existing conversation does not reorder the list.
        let conversations = engine.conversations().await;
        assert_eq!(conversations[0].id, newer.id);
        assert_eq!(conversations[1].id, older.id);
        assert_eq!(conversations[1].messages.len(), 2);
        assert!(conversations[0].messages.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_select_then_delete_clears_active() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        let conversation = engine.new_conversation().await;
        engine.select_conversation(conversation.id).await;
        engine.delete_conversation(conversation.id).await;

        assert_eq!(engine.active_conversation().await, None);
        assert!(engine.current_messages().await.is_empty());
        assert!(engine.conversations().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        let kept = engine.new_conversation().await;
        let doomed = engine.new_conversation().await;

        engine.delete_conversation(doomed.id).await;
        engine.delete_conversation(doomed.id).await;

        let conversations = engine.conversations().await;
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, kept.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_of_unknown_id_is_noop() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        engine.new_conversation().await;
        engine.delete_conversation(ConversationId::new()).await;
        assert_eq!(engine.conversations().await.len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_delete_is_silent_noop() -> ChatResult<()> {
        let engine = seedless_engine(1000)?;
        engine.send_message("éphémère", None).await?;

        let conversations = engine.conversations().await;
        engine.delete_conversation(conversations[0].id).await;

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(engine.conversations().await.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_targets_conversation_captured_at_send_time() -> ChatResult<()> {
        let engine = seedless_engine(1000)?;
        engine.send_message("première", None).await?;
        let origin = engine.conversations().await[0].id;

        // Switching the selection does not redirect the pending reply.
        engine.new_conversation().await;
        tokio::time::sleep(Duration::from_millis(1001)).await;

        let conversations = engine.conversations().await;
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[1].id, origin);
        assert_eq!(conversations[1].messages.len(), 2);
        assert!(conversations[0].messages.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_reply_appends_after_interleaved_sends() -> ChatResult<()> {
        let engine = seedless_engine(2000)?;
        engine.send_message("un", None).await?;
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.send_message("deux", None).await?;
        tokio::time::sleep(Duration::from_millis(5000)).await;

        let messages = engine.current_messages().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].text, "un");
        assert_eq!(messages[1].text, "deux");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert!(messages[2].text.contains("un"));
        assert!(messages[3].text.contains("deux"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_send_is_rejected() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        let result = engine.send_message("", None).await;
        assert!(matches!(result, Err(ChatError::InvalidMessage(_))));
        assert!(engine.conversations().await.is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_attachment_only_send_schedules_no_reply() -> ChatResult<()> {
        let engine = seedless_engine(0)?;
        let attachment = Attachment::new("rapport.pdf", "application/pdf", 4096, "blob:rapport");
        engine.send_message("", Some(attachment)).await?;

        let conversations = engine.conversations().await;
        assert_eq!(conversations[0].title, "rapport.pdf");
        assert_eq!(conversations[0].last_message, "📎 rapport.pdf");

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(engine.conversations().await[0].messages.len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_to_stale_selection_drops_message() -> ChatResult<()> {
        let engine = seedless_engine(1000)?;
        engine.select_conversation(ConversationId::new()).await;
        engine.send_message("perdu", None).await?;

        assert!(engine.conversations().await.is_empty());
        assert!(engine.current_messages().await.is_empty());

        // The scheduled reply resolves against the stale id and drops too.
        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(engine.conversations().await.is_empty());
        Ok(())
    }
}
