//! Storage crate: persistence for the chat dashboard.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Conversation, MessageRecord, UserSettings, AnalyticsRecord, AnalyticsMetrics
//! - [`repository`] – MessageStore trait
//! - [`conversation_repo`], [`message_repo`], [`settings_repo`], [`analytics_repo`] – SQLite repositories
//! - [`sqlite_pool`] – SqlitePoolManager

mod analytics_repo;
mod conversation_repo;
mod error;
mod message_repo;
mod models;
mod repository;
mod schema;
mod settings_repo;
mod sqlite_pool;

#[cfg(test)]
mod message_repo_test;

pub use analytics_repo::AnalyticsRepository;
pub use conversation_repo::ConversationRepository;
pub use error::StorageError;
pub use message_repo::MessageRepository;
pub use models::{
    AnalyticsMetrics, AnalyticsRecord, Conversation, MessageRecord, UserSettings, CHAT_THEMES,
};
pub use repository::MessageStore;
pub use settings_repo::SettingsRepository;
pub use sqlite_pool::SqlitePoolManager;

/// All repositories over one shared pool.
#[derive(Clone)]
pub struct Storage {
    pub conversations: ConversationRepository,
    pub messages: MessageRepository,
    pub settings: SettingsRepository,
    pub analytics: AnalyticsRepository,
}

impl Storage {
    /// Opens (or creates) the database at `database_url` and ensures the tables exist.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        schema::create_tables(pool_manager.pool()).await?;
        Ok(Self {
            conversations: ConversationRepository::new(pool_manager.clone()),
            messages: MessageRepository::new(pool_manager.clone()),
            settings: SettingsRepository::new(pool_manager.clone()),
            analytics: AnalyticsRepository::new(pool_manager),
        })
    }
}
