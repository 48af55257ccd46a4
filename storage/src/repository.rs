//! Message store abstraction used by the chat pipeline.

use async_trait::async_trait;
use helvia_core::Sender;

use crate::error::StorageError;
use crate::models::MessageRecord;

/// Append-only message log per conversation.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message and returns the stored record.
    async fn append(
        &self,
        conversation_id: &str,
        content: &str,
        sender: Sender,
    ) -> Result<MessageRecord, StorageError>;

    /// Lists a conversation's messages in creation order.
    async fn list(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, StorageError>;
}
