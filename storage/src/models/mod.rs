//! Row models for the storage tables.

mod analytics;
mod conversation;
mod message_record;
mod user_settings;

pub use analytics::{AnalyticsMetrics, AnalyticsRecord};
pub use conversation::Conversation;
pub use message_record::MessageRecord;
pub use user_settings::{UserSettings, CHAT_THEMES};
