//! Per-user chat settings. Cosmetic except `chat_language`, which seeds a conversation's first turn.

use chrono::{DateTime, Utc};
use helvia_core::Language;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub const CHAT_THEMES: [&str; 3] = ["green", "blue", "purple"];
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<i64> = 10..=20;
pub const BORDER_RADIUS_RANGE: std::ops::RangeInclusive<i64> = 0..=24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    pub user_id: String,
    pub chat_theme: String,
    pub chat_language: String,
    pub font_size: i64,
    pub border_radius: i64,
    pub sound_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Default settings for a user who has never saved any.
    pub fn defaults(user_id: &str, language: Language) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            chat_theme: CHAT_THEMES[0].to_string(),
            chat_language: language.code().to_string(),
            font_size: 14,
            border_radius: 16,
            sound_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn language(&self) -> Result<Language, StorageError> {
        self.chat_language
            .parse()
            .map_err(|_| StorageError::Invalid(format!("chat_language '{}'", self.chat_language)))
    }

    /// Checks theme, language and the slider ranges.
    pub fn validate(&self) -> Result<(), StorageError> {
        if !CHAT_THEMES.contains(&self.chat_theme.as_str()) {
            return Err(StorageError::Invalid(format!(
                "chat_theme '{}' (expected one of {})",
                self.chat_theme,
                CHAT_THEMES.join(", ")
            )));
        }
        self.language()?;
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(StorageError::Invalid(format!(
                "font_size {} (expected 10-20)",
                self.font_size
            )));
        }
        if !BORDER_RADIUS_RANGE.contains(&self.border_radius) {
            return Err(StorageError::Invalid(format!(
                "border_radius {} (expected 0-24)",
                self.border_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = UserSettings::defaults("u1", Language::Pt);
        assert!(s.validate().is_ok());
        assert_eq!(s.language().unwrap(), Language::Pt);
        assert_eq!(s.font_size, 14);
        assert_eq!(s.border_radius, 16);
        assert!(s.sound_enabled);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut s = UserSettings::defaults("u1", Language::En);
        s.font_size = 21;
        assert!(matches!(s.validate(), Err(StorageError::Invalid(_))));

        let mut s = UserSettings::defaults("u1", Language::En);
        s.border_radius = -1;
        assert!(s.validate().is_err());

        let mut s = UserSettings::defaults("u1", Language::En);
        s.chat_theme = "orange".to_string();
        assert!(s.validate().is_err());

        let mut s = UserSettings::defaults("u1", Language::En);
        s.chat_language = "de".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let mut s = UserSettings::defaults("u1", Language::En);
        s.font_size = 10;
        s.border_radius = 24;
        assert!(s.validate().is_ok());
        s.font_size = 20;
        s.border_radius = 0;
        assert!(s.validate().is_ok());
    }
}
