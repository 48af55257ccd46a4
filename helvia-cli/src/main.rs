//! helvia CLI: chat with the support assistant and manage conversations, settings and analytics.
//! Config from env (and `.env`) with CLI overrides.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use assistant_handlers::{ChatSession, TurnReport};
use clap::Parser;
use helvia_cli::output;
use helvia_cli::{AppConfig, Cli, Commands, ConfigOverrides, SettingsAction};
use helvia_core::{init_tracing, Language, TerminalBell};
use response_engine::{classify, detect_with_scores, FixedDelay};
use storage::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(ConfigOverrides {
        database_url: cli.database_url.clone(),
        user_id: cli.user.clone(),
    })
    .context("Load config from env (DATABASE_URL, HELVIA_*)")?;
    init_tracing(&config.log_file, cli.verbose)
        .with_context(|| format!("Initialize logging to {}", config.log_file))?;
    info!(user_id = %config.user_id, database_url = %config.database_url, "helvia starting");

    match cli.command {
        Commands::Chat {
            conversation,
            no_delay,
            mute,
        } => {
            let sound = if mute { Some(false) } else { config.sound };
            let session = open_session(&config, no_delay, sound).await?;
            handle_chat(&session, conversation).await
        }
        Commands::Ask {
            text,
            conversation,
            no_delay,
            json,
        } => {
            // The bell would end up inside the JSON on stdout.
            let sound = if json { Some(false) } else { config.sound };
            let session = open_session(&config, no_delay, sound).await?;
            handle_ask(&session, conversation, &text, json).await
        }
        Commands::Detect { text, fallback } => {
            handle_detect(&text, fallback);
            Ok(())
        }
        Commands::Conversations { json } => {
            let session = open_session(&config, true, Some(false)).await?;
            let conversations = session.conversations().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&conversations)?);
            } else if conversations.is_empty() {
                println!("No conversations yet.");
            } else {
                for c in &conversations {
                    println!("{}", output::conversation_line(c));
                }
            }
            Ok(())
        }
        Commands::History { conversation, json } => {
            let session = open_session(&config, true, Some(false)).await?;
            let messages = session.history(&conversation).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                for m in &messages {
                    println!("{}", output::message_line(m));
                }
            }
            Ok(())
        }
        Commands::Rename {
            conversation,
            title,
        } => {
            let session = open_session(&config, true, Some(false)).await?;
            let renamed = session.rename(&conversation, &title).await?;
            println!("{}", output::conversation_line(&renamed));
            Ok(())
        }
        Commands::Delete { conversation } => {
            let session = open_session(&config, true, Some(false)).await?;
            session.delete_conversation(&conversation).await?;
            println!("Deleted {}", conversation);
            Ok(())
        }
        Commands::Settings { action } => {
            let session = open_session(&config, true, Some(false)).await?;
            handle_settings(&session, action).await
        }
        Commands::Stats { json } => {
            let session = open_session(&config, true, Some(false)).await?;
            let metrics = session
                .storage()
                .analytics
                .metrics(session.user_id())
                .await
                .context("Load analytics")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                println!("{}", output::metrics_block(&metrics));
            }
            Ok(())
        }
        Commands::Rate {
            conversation,
            score,
        } => {
            let session = open_session(&config, true, Some(false)).await?;
            session.rate(&conversation, score).await?;
            println!("Thanks for rating {}/5", score);
            Ok(())
        }
    }
}

async fn open_session(
    config: &AppConfig,
    no_delay: bool,
    sound: Option<bool>,
) -> Result<ChatSession> {
    let storage = Storage::open(&config.database_url)
        .await
        .with_context(|| format!("Open database {}", config.database_url))?;
    let builder = ChatSession::builder(&config.user_id, storage)
        .default_language(config.default_language)
        .notifier(Arc::new(TerminalBell))
        .sound(sound);
    let builder = if no_delay {
        builder.delay(FixedDelay(Duration::ZERO))
    } else {
        builder.delay(config.delay())
    };
    builder.build().await.context("Start chat session")
}

fn print_report(report: &TurnReport) {
    match &report.reply {
        Some(reply) => {
            if report.switched {
                println!("(language: {})", report.language);
            }
            println!("assistant: {}", reply);
        }
        None => println!("(reply discarded)"),
    }
}

/// Runs one turn; Ctrl-C while the reply is pending discards it.
async fn send_cancellable(
    session: &ChatSession,
    conversation_id: &str,
    text: &str,
) -> helvia_core::Result<TurnReport> {
    let send = session.send(conversation_id, text);
    tokio::pin!(send);
    tokio::select! {
        result = &mut send => result,
        _ = tokio::signal::ctrl_c() => {
            session.cancel(conversation_id);
            send.await
        }
    }
}

async fn handle_chat(session: &ChatSession, conversation: Option<String>) -> Result<()> {
    let mut conversation_id = match conversation {
        Some(id) => {
            for m in session.history(&id).await? {
                println!("{}", output::message_line(&m));
            }
            id
        }
        None => start_and_greet(session).await?,
    };
    println!("(/new starts a conversation, /history shows it, /quit exits; Ctrl-C discards a pending reply)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/new" => {
                session.cancel(&conversation_id);
                conversation_id = start_and_greet(session).await?;
            }
            "/history" => {
                for m in session.history(&conversation_id).await? {
                    println!("{}", output::message_line(&m));
                }
            }
            text => {
                println!("{}", output::TYPING);
                match send_cancellable(session, &conversation_id, text).await {
                    Ok(report) => print_report(&report),
                    // Nothing fatal here: the user can resend.
                    Err(e) => eprintln!("error: {}", e),
                }
            }
        }
    }

    session.cancel_all();
    Ok(())
}

async fn start_and_greet(session: &ChatSession) -> Result<String> {
    let conversation = session.start_conversation(None).await?;
    println!("conversation {}", conversation.id);
    if let Some(welcome) = session.history(&conversation.id).await?.first() {
        println!("assistant: {}", welcome.content);
    }
    Ok(conversation.id)
}

async fn handle_ask(
    session: &ChatSession,
    conversation: Option<String>,
    text: &str,
    json: bool,
) -> Result<()> {
    let conversation_id = match conversation {
        Some(id) => id,
        None => session.start_conversation(None).await?.id,
    };
    let report = send_cancellable(session, &conversation_id, text).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn handle_detect(text: &str, fallback: Language) {
    let (detected, scores) = detect_with_scores(text, fallback);
    println!("{}", output::detection_block(&scores, detected, classify(text)));
}

async fn handle_settings(session: &ChatSession, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show { json } => {
            let settings = session.settings().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                println!("{}", output::settings_block(&settings));
            }
        }
        SettingsAction::Set {
            theme,
            language,
            font_size,
            border_radius,
            sound,
        } => {
            let mut settings = session.settings().await?;
            if let Some(theme) = theme {
                settings.chat_theme = theme;
            }
            if let Some(language) = language {
                settings.chat_language = language.code().to_string();
            }
            if let Some(font_size) = font_size {
                settings.font_size = font_size;
            }
            if let Some(border_radius) = border_radius {
                settings.border_radius = border_radius;
            }
            if let Some(sound) = sound {
                settings.sound_enabled = sound;
            }
            let saved = session.save_settings(&settings).await?;
            println!("{}", output::settings_block(&saved));
        }
    }
    Ok(())
}
