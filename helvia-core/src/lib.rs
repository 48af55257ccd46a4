//! # helvia-core
//!
//! Core types and traits shared by the support assistant: [`Language`], [`ChatMessage`], [`Handler`],
//! [`Notifier`], error types and tracing initialization. Used by response-engine, storage, handler-chain
//! and assistant-handlers.

pub mod error;
pub mod logger;
pub mod notify;
pub mod types;

pub use error::{HandlerError, HelviaError, Result};
pub use logger::init_tracing;
pub use notify::{Notifier, SilentNotifier, TerminalBell, ToneSpec};
pub use types::{ChatMessage, Handler, HandlerResponse, Language, Sender};
