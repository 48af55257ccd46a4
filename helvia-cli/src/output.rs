//! Plain-text rendering for the CLI.

use helvia_core::Sender;
use response_engine::{Intent, LanguageScores};
use storage::{AnalyticsMetrics, Conversation, MessageRecord, UserSettings};

pub const TYPING: &str = "assistant is typing...";

/// `id  2024-05-01 12:30  title`
pub fn conversation_line(conversation: &Conversation) -> String {
    format!(
        "{}  {}  {}",
        conversation.id,
        conversation.updated_at.format("%Y-%m-%d %H:%M"),
        conversation.display_title()
    )
}

pub fn message_line(message: &MessageRecord) -> String {
    let who = match message.sender() {
        Some(Sender::User) => "you",
        Some(Sender::Assistant) => "assistant",
        None => message.sender.as_str(),
    };
    format!(
        "[{}] {}: {}",
        message.created_at.format("%H:%M"),
        who,
        message.content
    )
}

fn seconds(ms: i64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

pub fn metrics_block(metrics: &AnalyticsMetrics) -> String {
    let satisfaction = if metrics.average_satisfaction > 0 {
        format!("{}/5", metrics.average_satisfaction)
    } else {
        "-".to_string()
    };
    format!(
        "Conversations:      {}\nResponses:          {}\nAvg response time:  {}\nSatisfaction:       {}",
        metrics.total_conversations,
        metrics.total_responses,
        seconds(metrics.average_response_time_ms),
        satisfaction
    )
}

pub fn settings_block(settings: &UserSettings) -> String {
    format!(
        "theme:          {}\nlanguage:       {}\nfont size:      {}px\nborder radius:  {}px\nsound:          {}",
        settings.chat_theme,
        settings.chat_language,
        settings.font_size,
        settings.border_radius,
        if settings.sound_enabled { "on" } else { "off" }
    )
}

/// One line per language in tie-break order, then the decision.
pub fn detection_block(scores: &LanguageScores, detected: impl std::fmt::Display, intent: Intent) -> String {
    let mut out = String::new();
    for (language, score) in scores.iter() {
        out.push_str(&format!("{}: {}\n", language, score));
    }
    out.push_str(&format!("detected: {}\nintent:   {}", detected, intent));
    out
}
