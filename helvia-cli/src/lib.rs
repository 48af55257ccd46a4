//! # helvia-cli
//!
//! CLI foundation for the `helvia` binary: argument parsing, config loading and text rendering.

pub mod cli;
pub mod config;
pub mod output;

pub use cli::{Cli, Commands, SettingsAction};
pub use config::{AppConfig, ConfigOverrides};
