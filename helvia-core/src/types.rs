//! Core types: chat language, sender, chat message, handler response, and Handler trait.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HelviaError;

/// Chat language. Closed set; every lexicon and reply table carries an entry for each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Pt,
    Fr,
}

impl Language {
    /// All languages in tie-break priority order (es > pt > fr > en).
    pub const ALL: [Language; 4] = [Language::Es, Language::Pt, Language::Fr, Language::En];

    /// Two-letter code as stored in settings and shown in the CLI.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Pt => "pt",
            Language::Fr => "fr",
        }
    }

    /// Position in [`Language::ALL`]; lower wins ties.
    pub fn priority(&self) -> usize {
        match self {
            Language::Es => 0,
            Language::Pt => 1,
            Language::Fr => 2,
            Language::En => 3,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = HelviaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            "pt" => Ok(Language::Pt),
            "fr" => Ok(Language::Fr),
            other => Err(HelviaError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = HelviaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "assistant" => Ok(Sender::Assistant),
            other => Err(HelviaError::Database(format!("invalid sender: {}", other))),
        }
    }
}

/// One chat message travelling through the handler chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    /// Owner of the conversation, as supplied by the auth collaborator.
    pub user_id: String,
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a user-authored message with a fresh id and the current timestamp.
    pub fn from_user(conversation_id: &str, user_id: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            sender: Sender::User,
            created_at: Utc::now(),
        }
    }
}

/// Handler result for the chain. `Reply(text)` carries the assistant reply so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach reply text.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &ChatMessage) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &ChatMessage) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &ChatMessage,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse_is_case_insensitive() {
        assert_eq!("ES".parse::<Language>().unwrap(), Language::Es);
        assert_eq!(" pt ".parse::<Language>().unwrap(), Language::Pt);
        assert!("de".parse::<Language>().is_err());
        assert!("".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_priority_matches_all_order() {
        for (i, lang) in Language::ALL.iter().enumerate() {
            assert_eq!(lang.priority(), i);
        }
    }

    #[test]
    fn test_language_serde_uses_code() {
        let json = serde_json::to_string(&Language::Fr).unwrap();
        assert_eq!(json, "\"fr\"");
        let back: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(back, Language::En);
    }

    #[test]
    fn test_sender_round_trip() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!(Sender::Assistant.to_string(), "assistant");
        assert!("bot".parse::<Sender>().is_err());
    }

    #[test]
    fn test_chat_message_from_user() {
        let m = ChatMessage::from_user("conv-1", "user-1", "hola");
        assert_eq!(m.sender, Sender::User);
        assert_eq!(m.conversation_id, "conv-1");
        assert_eq!(m.content, "hola");
        assert!(!m.id.is_empty());
    }
}
