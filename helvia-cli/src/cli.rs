//! CLI parser.

use clap::{Parser, Subcommand};
use helvia_core::Language;

#[derive(Parser, Debug)]
#[command(name = "helvia")]
#[command(about = "Multilingual support assistant: chat, conversations, settings and analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database path or URL (overrides DATABASE_URL).
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Acting user id (overrides HELVIA_USER_ID).
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Echo logs to stderr as well as the log file.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat. Starts a new conversation unless one is given.
    Chat {
        #[arg(short, long)]
        conversation: Option<String>,
        /// Reply immediately instead of simulating typing.
        #[arg(long)]
        no_delay: bool,
        /// No notification tone.
        #[arg(long)]
        mute: bool,
    },
    /// Send one message and print the reply.
    Ask {
        text: String,
        /// Conversation to continue; a new one is created otherwise.
        #[arg(short, long)]
        conversation: Option<String>,
        #[arg(long)]
        no_delay: bool,
        /// Print the turn report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show language scores and intent for a text without storing anything.
    Detect {
        text: String,
        /// Language kept when no signal wins.
        #[arg(short, long, default_value = "en")]
        fallback: Language,
    },
    /// List conversations, most recent first.
    Conversations {
        #[arg(long)]
        json: bool,
    },
    /// Print a conversation's transcript.
    History {
        conversation: String,
        #[arg(long)]
        json: bool,
    },
    /// Rename a conversation.
    Rename { conversation: String, title: String },
    /// Delete a conversation with its messages and analytics.
    Delete { conversation: String },
    /// Show or change chat settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Dashboard metrics for the user.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Rate a conversation from 1 to 5.
    Rate {
        conversation: String,
        #[arg(value_parser = clap::value_parser!(i64).range(1..=5))]
        score: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings; unspecified ones keep their value.
    Set {
        /// green, blue or purple.
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        language: Option<Language>,
        /// 10-20.
        #[arg(long)]
        font_size: Option<i64>,
        /// 0-24.
        #[arg(long)]
        border_radius: Option<i64>,
        #[arg(long)]
        sound: Option<bool>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_flags() {
        let cli = Cli::try_parse_from([
            "helvia", "--user", "u1", "ask", "¿Cuánto cuesta?", "--no-delay", "--json",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("u1"));
        match cli.command {
            Commands::Ask {
                text,
                no_delay,
                json,
                conversation,
            } => {
                assert_eq!(text, "¿Cuánto cuesta?");
                assert!(no_delay && json);
                assert!(conversation.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rate_score_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["helvia", "rate", "c1", "6"]).is_err());
        assert!(Cli::try_parse_from(["helvia", "rate", "c1", "5"]).is_ok());
    }

    #[test]
    fn test_settings_set_parses_language() {
        let cli = Cli::try_parse_from([
            "helvia", "settings", "set", "--language", "PT", "--sound", "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Settings {
                action: SettingsAction::Set {
                    language, sound, ..
                },
            } => {
                assert_eq!(language, Some(Language::Pt));
                assert_eq!(sound, Some(false));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["helvia", "settings", "set", "--language", "de"]).is_err());
    }
}
