//! Message record model for persistence.
//!
//! Maps to the `messages` table and is used by MessageRepository.

use chrono::{DateTime, Utc};
use helvia_core::Sender;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub conversation_id: String,
    pub content: String,
    /// `user` or `assistant`.
    pub sender: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    /// Creates a new record with a generated UUID and current timestamp.
    pub fn new(conversation_id: &str, content: &str, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            content: content.to_string(),
            sender: sender.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Parsed sender; `None` for rows written with an unknown tag.
    pub fn sender(&self) -> Option<Sender> {
        self.sender.parse().ok()
    }
}
