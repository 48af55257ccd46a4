//! # assistant-handlers
//!
//! Handlers that turn one user message into a persisted, paced assistant reply, and
//! [`ChatSession`], which runs them for a user's conversations.
//!
//! Chain order: [`LoggingHandler`] → [`NotificationHandler`] → [`PersistenceHandler`] →
//! [`AssistantHandler`]. After callbacks run in reverse, so the reply is stored before the tone plays.

mod assistant_handler;
mod logging_handler;
mod notification_handler;
mod persistence_handler;
mod session;
mod state;

pub use assistant_handler::AssistantHandler;
pub use logging_handler::LoggingHandler;
pub use notification_handler::NotificationHandler;
pub use persistence_handler::PersistenceHandler;
pub use session::{ChatSession, ChatSessionBuilder, TurnReport};
pub use state::{SessionState, TurnGuard};
