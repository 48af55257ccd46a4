//! Handler that appends the user message in before() and the assistant reply in after().

use std::sync::Arc;

use async_trait::async_trait;
use helvia_core::{ChatMessage, Handler, HandlerResponse, HelviaError, Result, Sender};
use storage::MessageStore;
use tracing::{error, info, instrument};

/// Persists both sides of a turn to the [`MessageStore`]. Write failures abort the turn with
/// [`HelviaError::Database`] so the caller can offer a resend.
#[derive(Clone)]
pub struct PersistenceHandler {
    store: Arc<dyn MessageStore>,
}

impl PersistenceHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    async fn append(&self, message: &ChatMessage, content: &str, sender: Sender) -> Result<()> {
        self.store
            .append(&message.conversation_id, content, sender)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    conversation_id = %message.conversation_id,
                    sender = %sender,
                    "Failed to save message"
                );
                HelviaError::Database(e.to_string())
            })?;
        Ok(())
    }
}

#[async_trait]
impl Handler for PersistenceHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &ChatMessage) -> Result<bool> {
        info!(
            conversation_id = %message.conversation_id,
            message_id = %message.id,
            "step: PersistenceHandler before, saving user message"
        );
        self.append(message, &message.content, Sender::User).await?;
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &ChatMessage, response: &HandlerResponse) -> Result<()> {
        if let HandlerResponse::Reply(text) = response {
            self.append(message, text, Sender::Assistant).await?;
            info!(
                conversation_id = %message.conversation_id,
                "step: PersistenceHandler after, reply saved"
            );
        }
        Ok(())
    }
}
