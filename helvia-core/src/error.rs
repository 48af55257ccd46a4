use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelviaError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Empty content")]
    EmptyContent,

    #[error("A reply is already pending for conversation {0}")]
    TurnInProgress(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
}

pub type Result<T> = std::result::Result<T, HelviaError>;
