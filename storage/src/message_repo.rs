//! Message repository: append-only message log per conversation.
//!
//! Uses SqlitePoolManager and MessageRecord. Appending bumps the owning conversation's `updated_at`
//! so dashboard lists stay ordered by activity.

use async_trait::async_trait;
use helvia_core::Sender;
use tracing::info;

use crate::error::StorageError;
use crate::models::MessageRecord;
use crate::repository::MessageStore;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Stores `message`; fails with NotFound when its conversation does not exist.
    pub async fn save(&self, message: &MessageRecord) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let touched = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(message.created_at)
            .bind(&message.conversation_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "conversation {}",
                message.conversation_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, content, sender, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.conversation_id)
        .bind(&message.content)
        .bind(&message.sender)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            sender = %message.sender,
            "Saved message"
        );
        Ok(())
    }

    pub async fn get_message_by_id(
        &self,
        message_id: &str,
    ) -> Result<Option<MessageRecord>, StorageError> {
        let message = sqlx::query_as::<_, MessageRecord>("SELECT * FROM messages WHERE id = ?")
            .bind(message_id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(message)
    }

    /// Messages of a conversation, oldest first.
    pub async fn get_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let messages = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(conversation_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!(
            conversation_id = %conversation_id,
            count = messages.len(),
            "Retrieved messages"
        );
        Ok(messages)
    }

    pub async fn count_for_conversation(&self, conversation_id: &str) -> Result<i64, StorageError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_one(self.pool_manager.pool())
                .await?;
        Ok(count.0)
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn append(
        &self,
        conversation_id: &str,
        content: &str,
        sender: Sender,
    ) -> Result<MessageRecord, StorageError> {
        let record = MessageRecord::new(conversation_id, content, sender);
        self.save(&record).await?;
        Ok(record)
    }

    async fn list(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, StorageError> {
        self.get_messages(conversation_id).await
    }
}
