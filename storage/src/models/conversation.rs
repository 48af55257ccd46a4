//! Conversation model. Maps to the `conversations` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CONVERSATION_TITLE: &str = "New conversation";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new conversation with a generated UUID; both timestamps are now.
    pub fn new(user_id: &str, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            created_at: now,
            updated_at: now,
        }
    }

    /// Title for display; untitled conversations show the default title.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_CONVERSATION_TITLE)
    }
}
