//! Handler that logs each user message and the final response.

use async_trait::async_trait;
use helvia_core::{ChatMessage, Handler, HandlerResponse, Result};
use tracing::{debug, info, instrument};

/// Logs the message in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &ChatMessage) -> Result<bool> {
        info!(
            user_id = %message.user_id,
            conversation_id = %message.conversation_id,
            message_content = %message.content,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &ChatMessage, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}
