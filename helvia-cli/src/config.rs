//! Application config loaded from environment variables (after `.env`), with CLI overrides.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use helvia_core::Language;
use response_engine::RandomDelay;

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub log_file: String,
    /// Stands in for the authenticated user of the dashboard.
    pub user_id: String,
    /// Used until the user saves a chat language.
    pub default_language: Language,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Forces the notification tone on or off; None follows the saved setting.
    pub sound: Option<bool>,
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be a boolean, got '{}'", key, other),
    }
}

fn parse_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, value)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Reads `DATABASE_URL`, `LOG_FILE`, `HELVIA_USER_ID`, `HELVIA_DEFAULT_LANGUAGE`,
    /// `HELVIA_MIN_DELAY_MS`, `HELVIA_MAX_DELAY_MS` and `HELVIA_SOUND`, then applies `overrides`
    /// and validates the result.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let database_url = overrides
            .database_url
            .unwrap_or_else(|| env::var("DATABASE_URL").unwrap_or_else(|_| "./helvia.db".to_string()));
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/helvia.log".to_string());
        let user_id = overrides
            .user_id
            .unwrap_or_else(|| env::var("HELVIA_USER_ID").unwrap_or_else(|_| "local".to_string()));
        let default_language = match env::var("HELVIA_DEFAULT_LANGUAGE") {
            Ok(code) => code
                .parse::<Language>()
                .with_context(|| format!("HELVIA_DEFAULT_LANGUAGE '{}'", code))?,
            Err(_) => Language::En,
        };
        let min_delay_ms = parse_u64("HELVIA_MIN_DELAY_MS", 1000)?;
        let max_delay_ms = parse_u64("HELVIA_MAX_DELAY_MS", 2000)?;
        let sound = match env::var("HELVIA_SOUND") {
            Ok(value) => Some(parse_bool("HELVIA_SOUND", &value)?),
            Err(_) => None,
        };

        let config = Self {
            database_url,
            log_file,
            user_id,
            default_language,
            min_delay_ms,
            max_delay_ms,
            sound,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("DATABASE_URL is empty");
        }
        if self.user_id.trim().is_empty() {
            bail!("HELVIA_USER_ID is empty");
        }
        if self.min_delay_ms > self.max_delay_ms {
            bail!(
                "HELVIA_MIN_DELAY_MS ({}) is greater than HELVIA_MAX_DELAY_MS ({})",
                self.min_delay_ms,
                self.max_delay_ms
            );
        }
        Ok(())
    }

    pub fn delay(&self) -> RandomDelay {
        RandomDelay::new(
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 7] = [
        "DATABASE_URL",
        "LOG_FILE",
        "HELVIA_USER_ID",
        "HELVIA_DEFAULT_LANGUAGE",
        "HELVIA_MIN_DELAY_MS",
        "HELVIA_MAX_DELAY_MS",
        "HELVIA_SOUND",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_load_config_with_defaults() {
        clear_env();

        let config = AppConfig::load(ConfigOverrides::default()).unwrap();

        assert_eq!(config.database_url, "./helvia.db");
        assert_eq!(config.log_file, "logs/helvia.log");
        assert_eq!(config.user_id, "local");
        assert_eq!(config.default_language, Language::En);
        assert_eq!(config.min_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 2000);
        assert_eq!(config.sound, None);
        assert_eq!(
            config.delay(),
            RandomDelay::new(Duration::from_millis(1000), Duration::from_millis(2000))
        );
    }

    #[test]
    #[serial]
    fn test_load_config_with_custom_values() {
        clear_env();
        env::set_var("DATABASE_URL", "sqlite::memory:");
        env::set_var("LOG_FILE", "/tmp/helvia-test.log");
        env::set_var("HELVIA_USER_ID", "alice");
        env::set_var("HELVIA_DEFAULT_LANGUAGE", "ES");
        env::set_var("HELVIA_MIN_DELAY_MS", "0");
        env::set_var("HELVIA_MAX_DELAY_MS", "10");
        env::set_var("HELVIA_SOUND", "off");

        let config = AppConfig::load(ConfigOverrides::default()).unwrap();
        clear_env();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.log_file, "/tmp/helvia-test.log");
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.default_language, Language::Es);
        assert_eq!(config.min_delay_ms, 0);
        assert_eq!(config.max_delay_ms, 10);
        assert_eq!(config.sound, Some(false));
    }

    #[test]
    #[serial]
    fn test_load_config_with_overrides() {
        clear_env();
        env::set_var("DATABASE_URL", "env.db");
        env::set_var("HELVIA_USER_ID", "env-user");

        let config = AppConfig::load(ConfigOverrides {
            database_url: Some("cli.db".to_string()),
            user_id: Some("cli-user".to_string()),
        })
        .unwrap();
        clear_env();

        assert_eq!(config.database_url, "cli.db");
        assert_eq!(config.user_id, "cli-user");
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_bad_values() {
        clear_env();
        env::set_var("HELVIA_DEFAULT_LANGUAGE", "de");
        assert!(AppConfig::load(ConfigOverrides::default()).is_err());

        clear_env();
        env::set_var("HELVIA_MIN_DELAY_MS", "3000");
        assert!(AppConfig::load(ConfigOverrides::default()).is_err());

        clear_env();
        env::set_var("HELVIA_MAX_DELAY_MS", "soon");
        assert!(AppConfig::load(ConfigOverrides::default()).is_err());

        clear_env();
        env::set_var("HELVIA_SOUND", "loud");
        assert!(AppConfig::load(ConfigOverrides::default()).is_err());

        clear_env();
    }
}
