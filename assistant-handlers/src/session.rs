//! Chat session: one user's conversations driven through the handler chain.
//!
//! [`ChatSession::send`] enforces at most one in-flight turn per conversation, seeds the
//! conversation language from the user's preferred chat language, and records analytics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use handler_chain::HandlerChain;
use helvia_core::{
    ChatMessage, HandlerError, HandlerResponse, HelviaError, Language, Notifier, Result, Sender,
    SilentNotifier,
};
use response_engine::{welcome, DelayGenerator, Intent, RandomDelay, ResponseEngine};
use serde::Serialize;
use storage::{
    AnalyticsRecord, Conversation, MessageRecord, MessageStore, Storage, StorageError,
    UserSettings,
};
use tracing::{error, info, instrument, warn};

use crate::assistant_handler::AssistantHandler;
use crate::logging_handler::LoggingHandler;
use crate::notification_handler::NotificationHandler;
use crate::persistence_handler::PersistenceHandler;
use crate::state::SessionState;

fn db_error(e: StorageError) -> HelviaError {
    HelviaError::Database(e.to_string())
}

/// What happened to one [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub conversation_id: String,
    /// None when the turn was cancelled before the reply was delivered.
    pub reply: Option<String>,
    pub intent: Option<Intent>,
    /// Conversation language after the turn.
    pub language: Language,
    pub switched: bool,
    pub response_time_ms: u64,
}

impl TurnReport {
    pub fn cancelled(&self) -> bool {
        self.reply.is_none()
    }
}

/// Builds a [`ChatSession`]. Defaults: random 1-2 s latency, silent notifier, messages stored in
/// the session's [`Storage`], English as the fallback language.
pub struct ChatSessionBuilder {
    user_id: String,
    storage: Storage,
    message_store: Option<Arc<dyn MessageStore>>,
    notifier: Arc<dyn Notifier>,
    delay: Box<dyn DelayGenerator>,
    default_language: Language,
    sound_override: Option<bool>,
}

impl ChatSessionBuilder {
    pub fn delay(mut self, delay: impl DelayGenerator + 'static) -> Self {
        self.delay = Box::new(delay);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the store used for chat messages (history reads and both sides of a turn).
    pub fn message_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.message_store = Some(store);
        self
    }

    /// Language used when the user has no saved settings.
    pub fn default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Forces sound on or off regardless of the saved `sound_enabled` setting.
    pub fn sound(mut self, enabled: Option<bool>) -> Self {
        self.sound_override = enabled;
        self
    }

    /// Loads the user's settings and assembles the handler chain.
    pub async fn build(self) -> Result<ChatSession> {
        let settings = self
            .storage
            .settings
            .get(&self.user_id)
            .await
            .map_err(db_error)?;
        let saved_sound = settings.as_ref().map(|s| s.sound_enabled).unwrap_or(true);
        let sound_enabled = Arc::new(AtomicBool::new(
            self.sound_override.unwrap_or(saved_sound),
        ));

        let store: Arc<dyn MessageStore> = match self.message_store {
            Some(store) => store,
            None => Arc::new(self.storage.messages.clone()),
        };
        let state = SessionState::new();

        let chain = HandlerChain::new()
            .add_handler(Arc::new(LoggingHandler))
            .add_handler(Arc::new(NotificationHandler::new(
                self.notifier,
                sound_enabled.clone(),
            )))
            .add_handler(Arc::new(PersistenceHandler::new(store.clone())))
            .add_handler(Arc::new(AssistantHandler::new(
                ResponseEngine::new(self.delay),
                state.clone(),
                self.default_language,
            )));

        info!(
            user_id = %self.user_id,
            sound_enabled = sound_enabled.load(Ordering::Relaxed),
            handlers = chain.len(),
            "Chat session ready"
        );

        Ok(ChatSession {
            user_id: self.user_id,
            storage: self.storage,
            store,
            chain,
            state,
            sound_enabled,
            sound_override: self.sound_override,
            default_language: self.default_language,
        })
    }
}

/// One user's chat session over shared storage.
pub struct ChatSession {
    user_id: String,
    storage: Storage,
    store: Arc<dyn MessageStore>,
    chain: HandlerChain,
    state: SessionState,
    sound_enabled: Arc<AtomicBool>,
    sound_override: Option<bool>,
    default_language: Language,
}

impl ChatSession {
    pub fn builder(user_id: impl Into<String>, storage: Storage) -> ChatSessionBuilder {
        ChatSessionBuilder {
            user_id: user_id.into(),
            storage,
            message_store: None,
            notifier: Arc::new(SilentNotifier),
            delay: Box::new(RandomDelay::default()),
            default_language: Language::En,
            sound_override: None,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Relaxed)
    }

    /// Saved settings, or defaults built from the fallback language.
    pub async fn settings(&self) -> Result<UserSettings> {
        let saved = self
            .storage
            .settings
            .get(&self.user_id)
            .await
            .map_err(db_error)?;
        Ok(saved.unwrap_or_else(|| UserSettings::defaults(&self.user_id, self.default_language)))
    }

    /// Validates and saves settings; the sound flag takes effect for the next reply.
    pub async fn save_settings(&self, settings: &UserSettings) -> Result<UserSettings> {
        let saved = self.storage.settings.upsert(settings).await.map_err(|e| match e {
            StorageError::Invalid(msg) => HelviaError::Config(msg),
            other => db_error(other),
        })?;
        if self.sound_override.is_none() {
            self.sound_enabled
                .store(saved.sound_enabled, Ordering::Relaxed);
        }
        Ok(saved)
    }

    async fn preferred_language(&self) -> Result<Language> {
        let settings = self.settings().await?;
        Ok(settings.language().unwrap_or(self.default_language))
    }

    async fn owned_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.storage
            .conversations
            .get(conversation_id)
            .await
            .map_err(db_error)?
            .filter(|c| c.user_id == self.user_id)
            .ok_or_else(|| HandlerError::ConversationNotFound(conversation_id.to_string()).into())
    }

    /// Creates a conversation and seeds it with the welcome message in the preferred language.
    #[instrument(skip(self))]
    pub async fn start_conversation(&self, title: Option<&str>) -> Result<Conversation> {
        let language = self.preferred_language().await?;
        let conversation = self
            .storage
            .conversations
            .create(&self.user_id, title)
            .await
            .map_err(db_error)?;
        self.store
            .append(&conversation.id, welcome(language), Sender::Assistant)
            .await
            .map_err(db_error)?;
        self.state.set_language(&conversation.id, language);

        info!(
            conversation_id = %conversation.id,
            language = %language,
            "Conversation started"
        );
        Ok(conversation)
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.storage
            .conversations
            .list_for_user(&self.user_id)
            .await
            .map_err(db_error)
    }

    /// The visible transcript, oldest first.
    pub async fn history(&self, conversation_id: &str) -> Result<Vec<MessageRecord>> {
        self.owned_conversation(conversation_id).await?;
        self.store.list(conversation_id).await.map_err(db_error)
    }

    pub async fn rename(&self, conversation_id: &str, title: &str) -> Result<Conversation> {
        self.owned_conversation(conversation_id).await?;
        self.storage
            .conversations
            .rename(conversation_id, title)
            .await
            .map_err(|e| match e {
                StorageError::Invalid(msg) => HelviaError::Config(msg),
                other => db_error(other),
            })
    }

    /// Deletes the conversation and everything stored for it, discarding a pending reply.
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        self.owned_conversation(conversation_id).await?;
        self.state.forget(conversation_id);
        self.storage
            .conversations
            .delete(conversation_id)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Runs one turn for `text` in the conversation.
    ///
    /// Errors: [`HandlerError::EmptyContent`] for blank text, [`HandlerError::TurnInProgress`]
    /// while the conversation's previous turn is pending, [`HelviaError::Database`] when the
    /// messages cannot be stored (the turn may be retried).
    #[instrument(skip(self, text))]
    pub async fn send(&self, conversation_id: &str, text: &str) -> Result<TurnReport> {
        if text.trim().is_empty() {
            return Err(HandlerError::EmptyContent.into());
        }
        let guard = self.state.begin_turn(conversation_id)?;

        self.owned_conversation(conversation_id).await?;
        let language = match self.state.language(conversation_id) {
            Some(language) => language,
            None => {
                let preferred = self.preferred_language().await?;
                self.state.set_language(conversation_id, preferred);
                preferred
            }
        };

        let message = ChatMessage::from_user(conversation_id, &self.user_id, text);
        let started = Instant::now();
        let response = if guard.is_cancelled() {
            HandlerResponse::Stop
        } else {
            self.chain.handle(&message).await?
        };
        let elapsed = started.elapsed();
        drop(guard);

        let report = match response {
            HandlerResponse::Reply(reply) => {
                let outcome = self.state.take_outcome(conversation_id);
                let (intent, new_language) = match &outcome {
                    Some(o) => (Some(o.intent), o.language),
                    None => (None, language),
                };
                self.record_response_time(conversation_id, elapsed).await;
                if new_language != language {
                    self.remember_language(new_language).await;
                }
                TurnReport {
                    conversation_id: conversation_id.to_string(),
                    reply: Some(reply),
                    intent,
                    language: new_language,
                    switched: new_language != language,
                    response_time_ms: elapsed.as_millis() as u64,
                }
            }
            _ => {
                info!(conversation_id = %conversation_id, "Turn ended without a reply");
                TurnReport {
                    conversation_id: conversation_id.to_string(),
                    reply: None,
                    intent: None,
                    language,
                    switched: false,
                    response_time_ms: elapsed.as_millis() as u64,
                }
            }
        };
        Ok(report)
    }

    /// Discards the pending reply of the conversation. Returns false if nothing was pending.
    pub fn cancel(&self, conversation_id: &str) -> bool {
        let cancelled = self.state.cancel(conversation_id);
        if cancelled {
            info!(conversation_id = %conversation_id, "Pending turn cancelled");
        }
        cancelled
    }

    /// Discards every pending reply (session teardown).
    pub fn cancel_all(&self) -> usize {
        let cancelled = self.state.cancel_all();
        if cancelled > 0 {
            info!(cancelled = cancelled, "Pending turns cancelled");
        }
        cancelled
    }

    /// Conversation language the next turn starts from, if known in this session.
    pub fn conversation_language(&self, conversation_id: &str) -> Option<Language> {
        self.state.language(conversation_id)
    }

    /// Stores a 1-5 satisfaction score for the conversation.
    pub async fn rate(&self, conversation_id: &str, score: i64) -> Result<()> {
        self.owned_conversation(conversation_id).await?;
        let record = AnalyticsRecord::new(&self.user_id, conversation_id, None, Some(score));
        self.storage
            .analytics
            .record(&record)
            .await
            .map_err(|e| match e {
                StorageError::Invalid(msg) => HelviaError::Config(msg),
                other => db_error(other),
            })
    }

    async fn record_response_time(&self, conversation_id: &str, elapsed: Duration) {
        let record = AnalyticsRecord::new(
            &self.user_id,
            conversation_id,
            Some(elapsed.as_millis() as i64),
            None,
        );
        if let Err(e) = self.storage.analytics.record(&record).await {
            error!(error = %e, conversation_id = %conversation_id, "Failed to record analytics");
        }
    }

    /// Writes the last used language back as the preferred chat language.
    async fn remember_language(&self, language: Language) {
        let result = async {
            let mut settings = self.settings().await?;
            settings.chat_language = language.code().to_string();
            self.storage
                .settings
                .upsert(&settings)
                .await
                .map_err(db_error)
        }
        .await;
        if let Err(e) = result {
            warn!(error = %e, language = %language, "Failed to save chat language");
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.state.cancel_all();
    }
}
