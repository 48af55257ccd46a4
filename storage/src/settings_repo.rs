//! Settings repository: one row of chat settings per user.

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::models::UserSettings;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SettingsRepository {
    pool_manager: SqlitePoolManager,
}

impl SettingsRepository {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Saved settings for `user_id`, or None if the user never saved any.
    pub async fn get(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        let settings =
            sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(settings)
    }

    /// Validates and inserts or updates the user's row. `created_at` of an existing row is kept.
    pub async fn upsert(&self, settings: &UserSettings) -> Result<UserSettings, StorageError> {
        settings.validate()?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_settings
                (user_id, chat_theme, chat_language, font_size, border_radius, sound_enabled, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                chat_theme = excluded.chat_theme,
                chat_language = excluded.chat_language,
                font_size = excluded.font_size,
                border_radius = excluded.border_radius,
                sound_enabled = excluded.sound_enabled,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.user_id)
        .bind(&settings.chat_theme)
        .bind(&settings.chat_language)
        .bind(settings.font_size)
        .bind(settings.border_radius)
        .bind(settings.sound_enabled)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        info!(
            user_id = %settings.user_id,
            chat_language = %settings.chat_language,
            sound_enabled = settings.sound_enabled,
            "Saved user settings"
        );

        self.get(&settings.user_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("settings for {}", settings.user_id)))
    }
}
