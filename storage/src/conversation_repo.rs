//! Conversation repository: per-user conversation metadata.

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::models::Conversation;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ConversationRepository {
    pool_manager: SqlitePoolManager,
}

impl ConversationRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Creates a conversation for `user_id`. A blank title is stored as untitled.
    pub async fn create(
        &self,
        user_id: &str,
        title: Option<&str>,
    ) -> Result<Conversation, StorageError> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let conversation = Conversation::new(user_id, title);

        sqlx::query(
            r#"
            INSERT INTO conversations (id, user_id, title, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&conversation.id)
        .bind(&conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!(
            conversation_id = %conversation.id,
            user_id = %user_id,
            "Created conversation"
        );
        Ok(conversation)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Conversation>, StorageError> {
        let conversation =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(conversation)
    }

    /// Conversations of `user_id`, most recently updated first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Conversation>, StorageError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        info!(
            user_id = %user_id,
            count = conversations.len(),
            "Retrieved conversations"
        );
        Ok(conversations)
    }

    /// Sets a new title (trimmed, must be non-empty) and bumps `updated_at`.
    pub async fn rename(&self, id: &str, title: &str) -> Result<Conversation, StorageError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StorageError::Invalid("conversation title is empty".to_string()));
        }

        let result = sqlx::query("UPDATE conversations SET title = ?, updated_at = ? WHERE id = ?")
            .bind(title)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("conversation {}", id)));
        }

        info!(conversation_id = %id, title = %title, "Renamed conversation");
        self.get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("conversation {}", id)))
    }

    /// Bumps `updated_at` to now.
    pub async fn touch(&self, id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("conversation {}", id)));
        }
        Ok(())
    }

    /// Deletes the conversation with its messages and analytics rows. Returns false if it did not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM analytics WHERE conversation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        info!(conversation_id = %id, deleted = deleted, "Deleted conversation");
        Ok(deleted)
    }
}
